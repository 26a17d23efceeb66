//! Read-only queries over the prepared table.
//!
//! Every function is pure: it borrows the table, never mutates it, and
//! returns a fresh result set. Row-returning queries hand out references
//! into the table rather than copies.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet, HashSet};

use serde::Serialize;

use super::error::QueryError;
use super::model::{AttendanceRecord, AttendanceTable, Metric};
use super::stats::{self, FiveNumberSummary, Regression};

// ---------------------------------------------------------------------------
// Filters
// ---------------------------------------------------------------------------

/// Rows of the given teams. An empty set selects nothing.
pub fn filter_by_teams<'a>(
    table: &'a AttendanceTable,
    teams: &BTreeSet<String>,
) -> Vec<&'a AttendanceRecord> {
    table
        .records()
        .iter()
        .filter(|r| teams.contains(&r.team))
        .collect()
}

pub fn filter_by_season(table: &AttendanceTable, season: i32) -> Vec<&AttendanceRecord> {
    table
        .records()
        .iter()
        .filter(|r| r.season == season)
        .collect()
}

/// Rows of the given seasons. An empty set selects nothing.
pub fn filter_by_seasons<'a>(
    table: &'a AttendanceTable,
    seasons: &BTreeSet<i32>,
) -> Vec<&'a AttendanceRecord> {
    table
        .records()
        .iter()
        .filter(|r| seasons.contains(&r.season))
        .collect()
}

/// One team's `(season, value)` points for `metric`, seasons ascending,
/// null values skipped.
pub fn team_metric_series(table: &AttendanceTable, team: &str, metric: Metric) -> Vec<(i32, f64)> {
    table
        .records()
        .iter()
        .filter(|r| r.team == team)
        .filter_map(|r| Some((r.season, metric.value(r)?)))
        .collect()
}

// ---------------------------------------------------------------------------
// Season ranking
// ---------------------------------------------------------------------------

/// The `n` best rows of a season by `metric`, descending, ties by team name.
/// Rows without a value rank last. `n` beyond the row count returns all rows.
pub fn top_n_by_season(
    table: &AttendanceTable,
    season: i32,
    n: usize,
    metric: Metric,
) -> Vec<&AttendanceRecord> {
    let mut rows = filter_by_season(table, season);
    rows.sort_by(|a, b| {
        descending_nulls_last(metric.value(a), metric.value(b)).then_with(|| a.team.cmp(&b.team))
    });
    rows.truncate(n);
    rows
}

fn descending_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonDistribution {
    pub season: i32,
    pub attendance: Option<FiveNumberSummary>,
    pub payroll: Option<FiveNumberSummary>,
}

pub fn season_distribution(table: &AttendanceTable, season: i32) -> SeasonDistribution {
    let rows = filter_by_season(table, season);
    SeasonDistribution {
        season,
        attendance: stats::five_number_summary(rows.iter().map(|r| r.attendance)),
        payroll: stats::five_number_summary(rows.iter().map(|r| r.estimated_payroll)),
    }
}

// ---------------------------------------------------------------------------
// League trends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonAggregate {
    pub season: i32,
    pub total_attendance: Option<f64>,
    pub total_payroll: Option<f64>,
    pub mean_attendance_per_game: Option<f64>,
    /// Rows in the season, with or without values.
    pub teams: usize,
}

/// Per-season league totals, seasons ascending. Nulls are skipped; a season
/// with no values for a metric reports `None` for it.
pub fn league_aggregate_by_season(table: &AttendanceTable) -> Vec<SeasonAggregate> {
    let mut by_season: BTreeMap<i32, Vec<&AttendanceRecord>> = BTreeMap::new();
    for r in table.records() {
        by_season.entry(r.season).or_default().push(r);
    }

    by_season
        .into_iter()
        .map(|(season, rows)| SeasonAggregate {
            season,
            total_attendance: stats::sum(rows.iter().map(|r| r.attendance)),
            total_payroll: stats::sum(rows.iter().map(|r| r.estimated_payroll)),
            mean_attendance_per_game: stats::mean(rows.iter().map(|r| r.attendance_per_game)),
            teams: rows.len(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
    /// `count / (n * width)`, so each season's bars integrate to 1.
    pub density: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonHistogram {
    pub season: i32,
    pub bins: Vec<HistogramBin>,
}

/// Density histograms of attendance per game, one per selected season, on
/// bin edges shared across the selection. Seasons without values are left
/// out.
pub fn attendance_per_game_histogram(
    table: &AttendanceTable,
    seasons: &BTreeSet<i32>,
    bins: usize,
) -> Vec<SeasonHistogram> {
    let mut values: BTreeMap<i32, Vec<f64>> = BTreeMap::new();
    for r in filter_by_seasons(table, seasons) {
        if let Some(v) = r.attendance_per_game {
            values.entry(r.season).or_default().push(v);
        }
    }
    let all = values.values().flatten().copied();
    let (Some(lo), Some(hi)) = (all.clone().reduce(f64::min), all.reduce(f64::max)) else {
        return Vec::new();
    };
    if bins == 0 {
        return Vec::new();
    }

    let (bins, width) = if hi > lo {
        (bins, (hi - lo) / bins as f64)
    } else {
        (1, 1.0)
    };

    values
        .into_iter()
        .map(|(season, vals)| {
            let mut counts = vec![0usize; bins];
            for v in &vals {
                let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
                counts[idx] += 1;
            }
            let n = vals.len() as f64;
            SeasonHistogram {
                season,
                bins: counts
                    .into_iter()
                    .enumerate()
                    .map(|(i, count)| HistogramBin {
                        start: lo + i as f64 * width,
                        end: lo + (i + 1) as f64 * width,
                        count,
                        density: count as f64 / (n * width),
                    })
                    .collect(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Team trends
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearOverYear {
    pub season: i32,
    pub attendance: Option<f64>,
    pub estimated_payroll: Option<f64>,
    pub efficiency: Option<f64>,
    pub attendance_pct: Option<f64>,
    pub payroll_pct: Option<f64>,
    pub efficiency_pct: Option<f64>,
}

/// Percent changes against the same team's previous season, seasons
/// ascending. A season only appears when the team also has a row for the
/// season right before it, so the first season and any season after a gap
/// are left out.
pub fn year_over_year_change(table: &AttendanceTable, team: &str) -> Vec<YearOverYear> {
    let rows: Vec<&AttendanceRecord> = table.records().iter().filter(|r| r.team == team).collect();

    rows.windows(2)
        .filter(|w| w[1].season == w[0].season + 1)
        .map(|w| {
            let (prev, cur) = (w[0], w[1]);
            YearOverYear {
                season: cur.season,
                attendance: cur.attendance,
                estimated_payroll: cur.estimated_payroll,
                efficiency: cur.efficiency,
                attendance_pct: stats::percent_change(prev.attendance, cur.attendance),
                payroll_pct: stats::percent_change(prev.estimated_payroll, cur.estimated_payroll),
                efficiency_pct: stats::percent_change(prev.efficiency, cur.efficiency),
            }
        })
        .collect()
}

/// Attendance regressed on payroll, for one team or the whole league.
pub fn payroll_attendance_fit(
    table: &AttendanceTable,
    team: Option<&str>,
) -> Result<Regression, QueryError> {
    let (xs, ys): (Vec<Option<f64>>, Vec<Option<f64>>) = table
        .records()
        .iter()
        .filter(|r| team.map_or(true, |t| r.team == t))
        .map(|r| (r.estimated_payroll, r.attendance))
        .unzip();
    stats::linear_regression(&xs, &ys)
}

// ---------------------------------------------------------------------------
// Championships
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChampionshipPremium {
    pub champion_avg: Option<f64>,
    pub non_champion_avg: Option<f64>,
    pub delta: Option<f64>,
    /// `None` when the non-champion average is zero or missing.
    pub percent_delta: Option<f64>,
    pub champion_teams: usize,
    pub non_champion_teams: usize,
}

/// Mean attendance of teams that ever won a title against teams that never
/// did, each over every season of their history.
pub fn championship_premium(table: &AttendanceTable) -> ChampionshipPremium {
    let champions: HashSet<&str> = table
        .records()
        .iter()
        .filter(|r| r.is_champion)
        .map(|r| r.team.as_str())
        .collect();
    let (champ_rows, other_rows): (Vec<&AttendanceRecord>, Vec<&AttendanceRecord>) = table
        .records()
        .iter()
        .partition(|r| champions.contains(r.team.as_str()));

    let champion_avg = stats::mean(champ_rows.iter().map(|r| r.attendance));
    let non_champion_avg = stats::mean(other_rows.iter().map(|r| r.attendance));
    let delta = champion_avg.zip(non_champion_avg).map(|(c, o)| c - o);

    ChampionshipPremium {
        champion_avg,
        non_champion_avg,
        delta,
        percent_delta: stats::percent_change(non_champion_avg, champion_avg),
        champion_teams: champions.len(),
        non_champion_teams: table.teams().len().saturating_sub(champions.len()),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamChampionships {
    pub team: String,
    pub titles: usize,
    pub finals_lost: usize,
    /// Over the team's full history in the attendance table.
    pub mean_attendance: Option<f64>,
}

/// Every team with at least one title, most titles first, then by name.
pub fn championships_by_team(table: &AttendanceTable) -> Vec<TeamChampionships> {
    let mut tally: BTreeMap<&str, (usize, usize)> = BTreeMap::new();
    for c in table.championships() {
        tally.entry(c.winner.as_str()).or_default().0 += 1;
        tally.entry(c.loser.as_str()).or_default().1 += 1;
    }

    let mut out: Vec<TeamChampionships> = tally
        .into_iter()
        .filter(|(_, (titles, _))| *titles > 0)
        .map(|(team, (titles, finals_lost))| TeamChampionships {
            team: team.to_string(),
            titles,
            finals_lost,
            mean_attendance: stats::mean(
                table
                    .records()
                    .iter()
                    .filter(|r| r.team == team)
                    .map(|r| r.attendance),
            ),
        })
        .collect();
    out.sort_by(|a, b| b.titles.cmp(&a.titles).then_with(|| a.team.cmp(&b.team)));
    out
}

/// Mean attendance change from a title season to the following season.
pub fn post_championship_change(table: &AttendanceTable) -> Option<f64> {
    stats::mean(
        table
            .records()
            .windows(2)
            .filter(|w| w[0].is_champion && w[0].team == w[1].team && w[1].season == w[0].season + 1)
            .map(|w| stats::percent_change(w[0].attendance, w[1].attendance)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::annotate::annotate;
    use crate::data::derive::derive_metrics;
    use crate::data::model::ChampionshipRecord;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn row(team: &str, season: i32, attendance: Option<f64>) -> AttendanceRecord {
        AttendanceRecord::raw(team, season, attendance, None, None)
    }

    fn table(rows: Vec<AttendanceRecord>) -> AttendanceTable {
        AttendanceTable::new(rows, Vec::new())
    }

    fn teams(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn team_filter_selects_only_listed_teams() {
        let t = table(vec![row("A", 2001, None), row("B", 2001, None), row("A", 2002, None)]);
        let rows = filter_by_teams(&t, &teams(&["A"]));
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| r.team == "A"));
    }

    #[test]
    fn empty_team_selection_is_empty_not_all() {
        let t = table(vec![row("A", 2001, None), row("B", 2001, None)]);
        assert!(filter_by_teams(&t, &BTreeSet::new()).is_empty());
        assert!(filter_by_seasons(&t, &BTreeSet::new()).is_empty());
    }

    #[test]
    fn season_filters() {
        let t = table(vec![row("A", 2001, None), row("B", 2002, None), row("C", 2003, None)]);
        assert_eq!(filter_by_season(&t, 2002).len(), 1);
        let picked: BTreeSet<i32> = [2001, 2003].into();
        let rows = filter_by_seasons(&t, &picked);
        assert_eq!(rows.iter().map(|r| r.season).collect::<Vec<_>>(), [2001, 2003]);
    }

    #[test]
    fn metric_series_skips_nulls() {
        let t = table(vec![row("A", 2002, None), row("A", 2001, Some(5.0)), row("A", 2003, Some(7.0))]);
        assert_eq!(
            team_metric_series(&t, "A", Metric::Attendance),
            vec![(2001, 5.0), (2003, 7.0)]
        );
    }

    fn ranking_table() -> AttendanceTable {
        table(vec![
            row("Delta", 2001, Some(300.0)),
            row("Alpha", 2001, Some(200.0)),
            row("Charlie", 2001, Some(300.0)),
            row("Bravo", 2001, None),
            row("Echo", 2002, Some(999.0)),
        ])
    }

    #[test]
    fn top_n_sorts_descending_with_name_tiebreak() {
        let t = ranking_table();
        let top: Vec<_> = top_n_by_season(&t, 2001, 3, Metric::Attendance)
            .iter()
            .map(|r| r.team.as_str())
            .collect();
        assert_eq!(top, ["Charlie", "Delta", "Alpha"]);
    }

    #[test]
    fn top_n_clamps_and_handles_zero() {
        let t = ranking_table();
        assert!(top_n_by_season(&t, 2001, 0, Metric::Attendance).is_empty());
        let all = top_n_by_season(&t, 2001, 100, Metric::Attendance);
        assert_eq!(all.len(), 4);
        assert_eq!(all[3].team, "Bravo");
        assert!(top_n_by_season(&t, 1900, 5, Metric::Attendance).is_empty());
    }

    #[test]
    fn league_aggregate_skips_nulls_per_metric() {
        let t = table(vec![
            AttendanceRecord::raw("A", 2001, Some(100.0), Some(10.0), Some(1000.0)),
            AttendanceRecord::raw("B", 2001, None, Some(20.0), Some(3000.0)),
            AttendanceRecord::raw("A", 2000, Some(50.0), None, None),
        ]);
        let agg = league_aggregate_by_season(&t);
        assert_eq!(agg.len(), 2);

        assert_eq!(agg[0].season, 2000);
        assert_eq!(agg[0].total_attendance, Some(50.0));
        assert_eq!(agg[0].total_payroll, None);
        assert_eq!(agg[0].mean_attendance_per_game, None);

        assert_eq!(agg[1].total_attendance, Some(100.0));
        assert_eq!(agg[1].total_payroll, Some(4000.0));
        assert_eq!(agg[1].mean_attendance_per_game, Some(15.0));
        assert_eq!(agg[1].teams, 2);
    }

    #[test]
    fn year_over_year_excludes_first_season() {
        let t = table(vec![
            row("A", 2001, Some(100.0)),
            row("A", 2002, Some(150.0)),
            row("A", 2003, Some(120.0)),
            row("B", 2002, Some(1.0)),
        ]);
        let yoy = year_over_year_change(&t, "A");
        assert_eq!(yoy.iter().map(|y| y.season).collect::<Vec<_>>(), [2002, 2003]);
        assert!(approx_eq(yoy[0].attendance_pct.unwrap(), 50.0));
        assert!(approx_eq(yoy[1].attendance_pct.unwrap(), -20.0));
    }

    #[test]
    fn year_over_year_does_not_bridge_gaps() {
        let t = table(vec![
            row("A", 2001, Some(100.0)),
            row("A", 2003, Some(120.0)),
            row("A", 2004, Some(60.0)),
        ]);
        let yoy = year_over_year_change(&t, "A");
        assert_eq!(yoy.len(), 1);
        assert_eq!(yoy[0].season, 2004);
        assert!(approx_eq(yoy[0].attendance_pct.unwrap(), -50.0));
    }

    #[test]
    fn year_over_year_keeps_row_with_partial_nulls() {
        let t = table(vec![
            AttendanceRecord::raw("A", 2001, Some(100.0), None, None),
            AttendanceRecord::raw("A", 2002, Some(110.0), None, Some(5.0)),
        ]);
        let yoy = year_over_year_change(&t, "A");
        assert_eq!(yoy.len(), 1);
        assert_eq!(yoy[0].payroll_pct, None);
        assert!(approx_eq(yoy[0].attendance_pct.unwrap(), 10.0));
    }

    #[test]
    fn payroll_fit_for_team_and_league() {
        let t = table(vec![
            AttendanceRecord::raw("A", 2001, Some(2.0), None, Some(1.0)),
            AttendanceRecord::raw("A", 2002, Some(4.0), None, Some(2.0)),
            AttendanceRecord::raw("B", 2001, Some(9.0), None, None),
        ]);
        let fit = payroll_attendance_fit(&t, Some("A")).unwrap();
        assert!(approx_eq(fit.slope, 2.0));
        assert_eq!(fit.n, 2);
        assert_eq!(payroll_attendance_fit(&t, None).unwrap().n, 2);
        assert_eq!(
            payroll_attendance_fit(&t, Some("B")),
            Err(QueryError::InsufficientData { required: 2, available: 0 })
        );
    }

    fn champion_table() -> AttendanceTable {
        let finals = vec![ChampionshipRecord {
            season: 2001,
            winner: "A".into(),
            loser: "B".into(),
            series_score: "4-1".into(),
        }];
        let rows = annotate(
            vec![
                row("A", 2001, Some(100.0)),
                row("A", 2002, Some(200.0)),
                row("B", 2001, Some(50.0)),
                row("B", 2002, Some(50.0)),
            ],
            &finals,
        );
        AttendanceTable::new(rows, finals)
    }

    #[test]
    fn premium_uses_full_history_of_champions() {
        let p = championship_premium(&champion_table());
        assert_eq!(p.champion_avg, Some(150.0));
        assert_eq!(p.non_champion_avg, Some(50.0));
        assert_eq!(p.delta, Some(100.0));
        assert!(approx_eq(p.percent_delta.unwrap(), 200.0));
        assert_eq!((p.champion_teams, p.non_champion_teams), (1, 1));
    }

    #[test]
    fn premium_percent_undefined_for_zero_baseline() {
        let t = table(vec![row("A", 2001, Some(0.0))]);
        let mut rows = t.records().to_vec();
        rows.push(AttendanceRecord {
            is_champion: true,
            ..row("B", 2001, Some(10.0))
        });
        let p = championship_premium(&AttendanceTable::new(rows, Vec::new()));
        assert_eq!(p.non_champion_avg, Some(0.0));
        assert_eq!(p.delta, Some(10.0));
        assert_eq!(p.percent_delta, None);
    }

    #[test]
    fn titles_by_team() {
        let by_team = championships_by_team(&champion_table());
        assert_eq!(
            by_team,
            vec![TeamChampionships {
                team: "A".into(),
                titles: 1,
                finals_lost: 0,
                mean_attendance: Some(150.0),
            }]
        );
    }

    #[test]
    fn post_title_change() {
        assert_eq!(post_championship_change(&champion_table()), Some(100.0));
        assert_eq!(post_championship_change(&table(vec![row("A", 2001, Some(1.0))])), None);
    }

    #[test]
    fn distribution_summarises_season() {
        let t = table(vec![
            AttendanceRecord::raw("A", 2001, Some(1.0), None, Some(10.0)),
            AttendanceRecord::raw("B", 2001, Some(3.0), None, None),
        ]);
        let d = season_distribution(&t, 2001);
        assert_eq!(d.attendance.unwrap().median, 2.0);
        assert_eq!(d.payroll.unwrap().count, 1);
        assert!(season_distribution(&t, 1999).attendance.is_none());
    }

    #[test]
    fn histogram_bins_share_edges_and_integrate_to_one() {
        let t = table(vec![
            AttendanceRecord::raw("A", 2001, None, Some(10.0), None),
            AttendanceRecord::raw("B", 2001, None, Some(20.0), None),
            AttendanceRecord::raw("C", 2002, None, Some(30.0), None),
        ]);
        let seasons: BTreeSet<i32> = [2001, 2002].into();
        let hist = attendance_per_game_histogram(&t, &seasons, 4);
        assert_eq!(hist.len(), 2);
        assert_eq!(hist[0].bins[0].start, 10.0);
        assert_eq!(hist[1].bins[3].end, 30.0);
        for h in &hist {
            let area: f64 = h.bins.iter().map(|b| b.density * (b.end - b.start)).sum();
            assert!(approx_eq(area, 1.0));
        }
        assert_eq!(hist[1].bins[3].count, 1);
        assert!(attendance_per_game_histogram(&t, &BTreeSet::new(), 4).is_empty());
    }

    #[test]
    fn queries_never_touch_efficiency_inputs() {
        let rows = vec![derive_metrics(AttendanceRecord::raw(
            "A",
            2001,
            Some(1.0e6),
            None,
            Some(0.0),
        ))];
        let t = table(rows);
        let before = t.records().to_vec();
        let _ = top_n_by_season(&t, 2001, 1, Metric::Efficiency);
        let _ = year_over_year_change(&t, "A");
        assert_eq!(t.records(), before.as_slice());
        assert_eq!(t.records()[0].efficiency, None);
    }

    #[test]
    fn queries_on_degraded_table_are_empty() {
        let t = AttendanceTable::empty();
        let seasons = BTreeSet::from([2020, 2021]);

        assert!(filter_by_teams(&t, &BTreeSet::from(["A".to_string()])).is_empty());
        assert!(filter_by_seasons(&t, &seasons).is_empty());
        assert!(top_n_by_season(&t, 2020, 10, Metric::Attendance).is_empty());
        assert!(team_metric_series(&t, "A", Metric::Attendance).is_empty());
        assert!(league_aggregate_by_season(&t).is_empty());
        assert!(year_over_year_change(&t, "A").is_empty());
        assert!(attendance_per_game_histogram(&t, &seasons, 20).is_empty());
        assert!(championships_by_team(&t).is_empty());
        assert_eq!(post_championship_change(&t), None);

        let p = championship_premium(&t);
        assert_eq!(
            (p.champion_avg, p.non_champion_avg, p.delta, p.percent_delta),
            (None, None, None, None)
        );
        assert_eq!((p.champion_teams, p.non_champion_teams), (0, 0));
    }
}
