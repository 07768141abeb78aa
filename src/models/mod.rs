mod article;
mod category;

pub use article::{AddedArticle, Article, ArticleSummary, ExtractedArticle, NewArticle};
pub use category::Category;

/// Category label shown when an article's category row cannot be resolved.
pub const UNCATEGORIZED: &str = "Uncategorized";
