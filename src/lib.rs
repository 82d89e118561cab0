pub mod combine;
pub mod config;
pub mod error;
pub mod inspect;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod table;
