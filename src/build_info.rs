//! Compile-time build information, shown by `gacha-sim --version`.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));
