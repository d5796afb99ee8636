pub mod assistant;
pub mod delay;
pub mod dispatcher;
pub mod listener;
pub mod ticket;
pub mod traits;
pub mod typewriter;
