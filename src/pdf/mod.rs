pub mod pdftk;
