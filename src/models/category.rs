use std::fmt;

/// Card category derived from listing title keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Pokemon,
    Basketball,
    Football,
    Baseball,
    Other,
}

const POKEMON_WORDS: &[&str] = &["pokemon", "pokémon", "pikachu", "charizard", "tcg", "holo", "eevee", "mewtwo"];
const BASKETBALL_WORDS: &[&str] = &["nba", "basketball", "hoops", "morant", "lebron", "wembanyama", "jordan"];
const FOOTBALL_WORDS: &[&str] = &["nfl", "football", "mahomes", "lawrence", "brady", "burrow"];
const BASEBALL_WORDS: &[&str] = &["mlb", "baseball", "topps", "bowman", "ohtani", "trout"];

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Pokemon,
        Category::Basketball,
        Category::Football,
        Category::Baseball,
        Category::Other,
    ];

    /// Tag a title by keyword. The first category with a matching word wins;
    /// anything unmatched is `Other`.
    pub fn from_title(title: &str) -> Self {
        let words = words(title);
        let table: [(Category, &[&str]); 4] = [
            (Category::Pokemon, POKEMON_WORDS),
            (Category::Basketball, BASKETBALL_WORDS),
            (Category::Football, FOOTBALL_WORDS),
            (Category::Baseball, BASEBALL_WORDS),
        ];

        table
            .iter()
            .find(|(_, keywords)| words.iter().any(|w| keywords.contains(&w.as_str())))
            .map(|(category, _)| *category)
            .unwrap_or(Category::Other)
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(name.trim()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Pokemon => "Pokemon",
            Category::Basketball => "Basketball",
            Category::Football => "Football",
            Category::Baseball => "Baseball",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Third-party grading service named in a title
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GradingCompany {
    Psa,
    Bgs,
    Sgc,
}

impl GradingCompany {
    pub fn from_title(title: &str) -> Option<Self> {
        words(title).iter().find_map(|w| Self::parse(w))
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "psa" => Some(GradingCompany::Psa),
            "bgs" | "beckett" => Some(GradingCompany::Bgs),
            "sgc" => Some(GradingCompany::Sgc),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GradingCompany::Psa => "PSA",
            GradingCompany::Bgs => "BGS",
            GradingCompany::Sgc => "SGC",
        }
    }
}

impl fmt::Display for GradingCompany {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn words(title: &str) -> Vec<String> {
    title
        .to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}
