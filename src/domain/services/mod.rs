mod ranking;

pub use ranking::select_top;
