mod alert_email;
mod helpers;
