pub mod config;
pub mod db;
pub mod dictionary;
pub mod models;
pub mod tags;
