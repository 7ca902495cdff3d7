pub mod scanner;
pub mod sequencer;
pub mod worker;
pub mod wps_client;
