use std::collections::{HashMap, HashSet};

use super::error::PrepWarning;
use super::model::{AttendanceRecord, ChampionshipRecord};

/// Drop championship rows that break the one-final-per-season shape:
/// a winner equal to its loser, or a second row for a season already seen.
pub fn validate_championships(
    records: Vec<ChampionshipRecord>,
) -> (Vec<ChampionshipRecord>, Vec<PrepWarning>) {
    let mut seen: HashMap<i32, String> = HashMap::new();
    let mut kept = Vec::with_capacity(records.len());
    let mut warnings = Vec::new();

    for record in records {
        if record.winner == record.loser {
            warnings.push(PrepWarning::InvalidChampionship {
                season: record.season,
                reason: format!("{} listed as both winner and loser", record.winner),
            });
            continue;
        }
        if let Some(first) = seen.get(&record.season) {
            warnings.push(PrepWarning::InvalidChampionship {
                season: record.season,
                reason: format!("season already won by {first}"),
            });
            continue;
        }
        seen.insert(record.season, record.winner.clone());
        kept.push(record);
    }

    (kept, warnings)
}

/// Season-keyed lookup of finalists.
#[derive(Debug, Default)]
pub struct ChampionshipIndex<'a> {
    winners: HashSet<(i32, &'a str)>,
    losers: HashSet<(i32, &'a str)>,
}

impl<'a> ChampionshipIndex<'a> {
    pub fn new(championships: &'a [ChampionshipRecord]) -> Self {
        let mut index = ChampionshipIndex::default();
        for c in championships {
            index.winners.insert((c.season, c.winner.as_str()));
            index.losers.insert((c.season, c.loser.as_str()));
        }
        index
    }

    pub fn is_champion(&self, season: i32, team: &str) -> bool {
        self.winners.contains(&(season, team))
    }

    pub fn is_finalist(&self, season: i32, team: &str) -> bool {
        self.losers.contains(&(season, team))
    }
}

/// Set championship flags on every row. Row count and order are unchanged.
///
/// Both inputs must already use canonical team names.
pub fn annotate(
    records: Vec<AttendanceRecord>,
    championships: &[ChampionshipRecord],
) -> Vec<AttendanceRecord> {
    let index = ChampionshipIndex::new(championships);
    records
        .into_iter()
        .map(|mut r| {
            r.is_champion = index.is_champion(r.season, &r.team);
            r.is_finalist = index.is_finalist(r.season, &r.team);
            r
        })
        .collect()
}
