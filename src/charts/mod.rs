//! Charts module - Chart rendering

mod plotter;
mod renderer;
mod wordcloud;

pub use plotter::ChartPlotter;
pub use renderer::StaticChartRenderer;
pub use wordcloud::{word_frequencies, WordCloud, WordCloudBuilder};
