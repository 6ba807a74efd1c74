pub mod cpu_ref;
pub mod instrumented;
