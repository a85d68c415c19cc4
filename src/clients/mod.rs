pub mod gmail_client;
pub mod service_account;

pub use gmail_client::{GmailClient, MailSender, GMAIL_API_BASE, GMAIL_SEND_SCOPE};
pub use service_account::ServiceAccountKey;
