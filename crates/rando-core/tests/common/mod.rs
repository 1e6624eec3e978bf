pub mod counter_server;
