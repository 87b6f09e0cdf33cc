pub mod munin;

pub use munin::Mode;
