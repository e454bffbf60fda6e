pub mod decline;
