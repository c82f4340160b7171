pub mod exercises;
pub mod lessons;
pub mod modules;
pub mod users;
