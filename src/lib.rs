// Crate entry point. Re-export modules so tests and binaries can import them easily.
//
// Responsibilities
// - Only declare and expose modules. No business logic here.

pub mod config;

pub mod core {
    pub mod event;
    pub mod order;
    pub mod ports;
}

pub mod application {
    pub mod consumer;
    pub mod errors;
    pub mod projector;
    pub mod command_handlers {
        pub mod create_order;
    }
    pub mod query_handlers {
        pub mod order_queries;
    }
}

pub mod adapters {
    pub mod in_memory {
        pub mod in_memory_log;
        pub mod in_memory_read_store;
        pub mod in_memory_write_store;
    }
}

pub mod shell;
