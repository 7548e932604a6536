mod error;
mod launcher;
mod logging;
mod port;
mod scanner;
