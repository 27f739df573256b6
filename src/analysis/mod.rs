pub mod entities;
pub mod frequency;
pub mod stopwords;
pub mod wordcloud;

pub use entities::{Entity, EntityModel, EntityRecognizer};
pub use frequency::{EntityCount, EntityFrequencyTable};
pub use stopwords::StopWords;
pub use wordcloud::{WordCloud, WordCloudOptions, generate_wordcloud, generate_wordcloud_with};
