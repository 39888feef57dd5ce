mod contribution;
mod key_figures;
mod portfolio;
mod projection;

pub use contribution::Contribution;
pub use key_figures::{KeyFigureRow, KeyFiguresResponse, PORTFOLIO_ROW};
pub use portfolio::{SavePortfolio, SavePortfolioResponse};
pub use projection::ProjectionPath;
