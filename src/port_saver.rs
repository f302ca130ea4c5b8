use rocket::fairing::{Fairing, Info, Kind};
use rocket::{Orbit, Rocket};
use tokio::sync::watch;

/// Pairs a fairing that publishes the port rocket bound to with a handle that
/// waits for it. Needed when the configured port is `0`.
pub fn create_pair() -> (PortSaver, Port) {
    let (sender, receiver) = watch::channel(None);
    (PortSaver { sender }, Port { receiver })
}

pub struct Port {
    receiver: watch::Receiver<Option<u16>>,
}

impl Port {
    /// Resolves once the server has lifted off. `None` if it never will.
    pub async fn get(&mut self) -> Option<u16> {
        loop {
            if let Some(port) = *self.receiver.borrow() {
                return Some(port);
            }
            if self.receiver.changed().await.is_err() {
                return *self.receiver.borrow();
            }
        }
    }
}

pub struct PortSaver {
    sender: watch::Sender<Option<u16>>,
}

#[rocket::async_trait]
impl Fairing for PortSaver {
    fn info(&self) -> Info {
        Info {
            name: "Port Saver",
            kind: Kind::Liftoff,
        }
    }

    async fn on_liftoff(&self, rocket: &Rocket<Orbit>) {
        if self.sender.send(Some(rocket.config().port)).is_err() {
            tracing::warn!("Nobody is waiting for the bound port");
        }
    }
}
