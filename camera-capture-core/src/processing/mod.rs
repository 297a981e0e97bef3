pub mod bit_rate;
pub mod code_scanner_pipeline;
pub mod frame;
pub mod frame_dispatcher;
