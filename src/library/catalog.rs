use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::library::episode::Episode;

pub const SUBJECTS: &[&str] = &["Technology", "Science", "History", "Arts", "Business", "Health"];

pub const STYLES: &[&str] = &[
    "Quick Bites",
    "Deep Dives",
    "Story Time",
    "Key Ideas Explained",
    "Casual Conversations",
    "Big Picture View",
    "Beginner's Guide",
];

/// Subject filter value that matches every episode.
pub const ALL_SUBJECTS: &str = "All";

const SAMPLES: &[(&str, &str, &str)] = &[
    ("The Future of AI", "45:00", "Technology"),
    ("Quantum Computing Explained", "30:00", "Science"),
    ("The Rise and Fall of Ancient Rome", "60:00", "History"),
    ("Modern Art Movements", "40:00", "Arts"),
    ("Startup Funding Strategies", "50:00", "Business"),
    ("Mental Health in the Digital Age", "35:00", "Health"),
    ("Blockchain and Cryptocurrency", "55:00", "Technology"),
    ("The Search for Exoplanets", "40:00", "Science"),
    ("The French Revolution", "65:00", "History"),
    ("Contemporary Dance Techniques", "35:00", "Arts"),
    ("Digital Marketing Trends", "45:00", "Business"),
    ("Nutrition and Longevity", "50:00", "Health"),
    ("5G Networks and IoT", "40:00", "Technology"),
    ("Gene Editing with CRISPR", "55:00", "Science"),
    ("The Industrial Revolution", "70:00", "History"),
    ("Film Photography in the Digital Age", "30:00", "Arts"),
    ("Sustainable Business Practices", "45:00", "Business"),
    ("Sleep Science and Productivity", "40:00", "Health"),
];

static SAMPLE_EPISODES: Lazy<Vec<Episode>> = Lazy::new(|| {
    SAMPLES
        .iter()
        .zip(1u64..)
        .map(|((title, duration, subject), id)| Episode {
            id,
            title: title.to_string(),
            duration: duration.to_string(),
            subject: subject.to_string(),
            transcript: format!("This is a sample transcript for {} episode...", title),
            audio_url: None,
        })
        .collect()
});

/// Query for `GET /episodes`.
#[derive(Deserialize, Debug, Default, Clone)]
pub struct EpisodeFilter {
    pub subject: Option<String>,
    pub q: Option<String>,
}

impl EpisodeFilter {
    pub fn matches(&self, episode: &Episode) -> bool {
        let subject_matches = match self.subject.as_deref().map(str::trim) {
            None | Some("") | Some(ALL_SUBJECTS) => true,
            Some(subject) => episode.subject.eq_ignore_ascii_case(subject),
        };

        let query_matches = match self.q.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(query) => episode.title.to_lowercase().contains(&query.to_lowercase()),
        };

        subject_matches && query_matches
    }
}

pub fn sample_episodes() -> &'static [Episode] {
    &SAMPLE_EPISODES
}

pub fn filter_episodes<'a>(
    episodes: impl IntoIterator<Item = &'a Episode>,
    filter: &EpisodeFilter,
) -> Vec<Episode> {
    episodes
        .into_iter()
        .filter(|episode| filter.matches(episode))
        .cloned()
        .collect()
}

/// Choices offered by the generator form.
#[derive(Serialize, Debug)]
pub struct GeneratorOptions {
    pub subjects: &'static [&'static str],
    pub styles: &'static [&'static str],
}

pub fn generator_options() -> GeneratorOptions {
    GeneratorOptions {
        subjects: SUBJECTS,
        styles: STYLES,
    }
}
