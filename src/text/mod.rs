//! Text utilities: tokenization, stemming, markup stripping, title/link extraction,
//! language detection, and quality scoring (spec §4.1). All pure functions over `&str`.

pub mod lang;
pub mod links;
pub mod markup;
pub mod quality;
pub mod stopwords;
pub mod tokenize;

pub use lang::detect_language;
pub use links::extract_links;
pub use markup::{extract_title, strip_markup};
pub use quality::score_quality;
pub use tokenize::{stem, tokenize};
