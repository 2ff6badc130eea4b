pub mod fs_size_calculator;
pub mod time_util;
