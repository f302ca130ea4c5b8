use crm_mailer::configuration::get_configuration;
use crm_mailer::email::{Email, FallbackEmailClient, ResendEmailClient, SmtpEmailClient};
use crm_mailer::startup::Application;
use crm_mailer::telemetry::{get_subscriber, init_subscriber};
use std::sync::Arc;

#[rocket::main]
async fn main() -> Result<(), rocket::Error> {
    let subscriber = get_subscriber("crm_mailer".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let configuration = get_configuration().expect("Failed to read configuration.");
    let smtp: Arc<dyn Email> = Arc::new(SmtpEmailClient::new(
        configuration.smtp.credentials(),
        configuration.email_client.timeout(),
    ));
    let resend: Arc<dyn Email> = Arc::new(ResendEmailClient::new(
        configuration.resend.base_url.clone(),
        configuration.smtp.sender(),
        configuration.resend.api_key(),
        configuration.email_client.timeout(),
    ));
    let email_client = if configuration.email_client.use_resend {
        FallbackEmailClient::new(resend, smtp)
    } else {
        FallbackEmailClient::new(smtp, resend)
    };

    let application = Application::build(&configuration, Arc::new(email_client)).await?;
    application.server.launch().await?;
    Ok(())
}
