pub mod db;
pub mod mailer;
