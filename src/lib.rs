pub mod catalog;
pub mod collision;
pub mod config;
pub mod dispatch;
pub mod entities;
pub mod math;
pub mod playfield;
pub mod population;
pub mod ports;
pub mod update;
