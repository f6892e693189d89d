pub mod controls;
pub mod suggestion_list;
pub mod text_input;
pub mod text_input_common;
