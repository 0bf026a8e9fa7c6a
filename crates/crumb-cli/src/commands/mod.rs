pub mod dispatch;
mod get;
mod invalidate;
mod refresh;
mod status;
