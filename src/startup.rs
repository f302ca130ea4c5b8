use crate::catchers::*;
use crate::configuration::Settings;
use crate::email::{BatchMailer, Email};
use crate::guards::AdminSecret;
use crate::port_saver;
use crate::port_saver::Port;
use crate::routes::*;
use rocket::{Config, Ignite, Rocket};
use secrecy::{ExposeSecret, Secret};
use std::sync::Arc;

/// Public URL of the CRM front end, used for links inside emails.
pub struct ApplicationBaseUrl(pub String);

pub struct Application {
    pub server: Rocket<Ignite>,
    pub port: Port,
}

impl Application {
    pub async fn build(
        configuration: &Settings,
        email_client: Arc<dyn Email>,
    ) -> Result<Application, rocket::Error> {
        let (port_saver, port) = port_saver::create_pair();
        let admin_token = configuration.application.admin_token.expose_secret().clone();
        let server = rocket::custom(Config {
            address: configuration.application.host,
            port: configuration.application.port.unwrap_or(0),
            ..Config::debug_default()
        })
        .attach(port_saver)
        .manage(BatchMailer::new(email_client.clone()))
        .manage(email_client)
        .manage(ApplicationBaseUrl(configuration.application.base_url.clone()))
        .manage(AdminSecret(Secret::new(admin_token)))
        .mount(
            "/",
            routes![health_check, send_alert_email, send_alert_notifications],
        )
        .register(
            "/",
            catchers![
                unauthorized_request_credentials,
                unprocessable_entity_to_bad_request
            ],
        )
        .ignite()
        .await?;
        Ok(Application { server, port })
    }
}
