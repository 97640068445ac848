pub mod lyrics;
