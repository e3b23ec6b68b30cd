pub mod chat;
pub mod chatbot;
