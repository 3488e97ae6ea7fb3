mod app;
mod runner;
mod view;

pub use runner::run;
