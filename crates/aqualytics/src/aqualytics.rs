//! Main Aqualytics struct and public API.

use std::path::Path;

use chrono::NaiveDate;

use crate::aggregate::{
    HeadToHead, Period, PersonalBest, Progression, RankingPage, RankingQuery, TeamComparison,
    head_to_head, notable_differences, personal_bests, progression, rankings,
};
use crate::config::AnalyticsConfig;
use crate::error::Result;
use crate::import::{BatchImporter, ImportResult};
use crate::metrics::{
    Derivation, DerivedMetricRecord, MetricCatalog, MetricEngine, MetricGroup, RaceTotals,
};
use crate::race::{CourseLength, RaceContext, RawSegmentInput, SplitPlan, plan};
use crate::scoring::{ComparisonSet, ScoreBoard, Scorer};
use crate::validation::{CsvValidator, ValidationReport};

/// Entry point tying the components together under one configuration.
pub struct Aqualytics {
    config: AnalyticsConfig,
    catalog: &'static MetricCatalog,
    validator: CsvValidator,
    importer: BatchImporter,
    engine: MetricEngine,
}

impl Aqualytics {
    /// Create an instance with default configuration.
    pub fn new() -> Self {
        Self::with_config(AnalyticsConfig::default())
    }

    /// Create an instance with custom configuration.
    pub fn with_config(config: AnalyticsConfig) -> Self {
        let validator = CsvValidator::with_config(config.validator.clone());
        let importer = BatchImporter::with_parts(
            config.validator.clone(),
            config.import.clone(),
            config.limits,
        );
        let engine = MetricEngine::with_limits(config.limits);

        Self {
            config,
            catalog: MetricCatalog::global(),
            validator,
            importer,
            engine,
        }
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    pub fn catalog(&self) -> &MetricCatalog {
        self.catalog
    }

    /// Capture plan for a race no longer than the configured maximum.
    pub fn segments(&self, distance: u32, course: CourseLength) -> Result<SplitPlan> {
        self.config.limits.check_distance(distance)?;
        Ok(plan(distance, course))
    }

    /// Derive metrics for one race from per-segment inputs.
    pub fn derive(
        &self,
        context: &RaceContext,
        inputs: &[RawSegmentInput],
        totals: &RaceTotals,
    ) -> Result<Derivation> {
        self.engine.derive_race(context, inputs, totals)
    }

    /// Validate CSV content.
    pub fn validate(&self, content: &str) -> ValidationReport {
        self.validator.validate(content)
    }

    /// Validate a CSV file.
    pub fn validate_file(&self, path: impl AsRef<Path>) -> Result<ValidationReport> {
        self.validator.validate_file(path)
    }

    /// Validate, parse and derive CSV content.
    pub fn import(&self, content: &str) -> ImportResult {
        self.importer.run(content)
    }

    /// Validate, parse and derive a CSV file.
    pub fn import_file(&self, path: impl AsRef<Path>) -> Result<ImportResult> {
        self.importer.run_file(path)
    }

    pub fn personal_bests(
        &self,
        records: &[DerivedMetricRecord],
        swimmer: &str,
    ) -> Result<Vec<PersonalBest>> {
        personal_bests(records, swimmer, self.catalog)
    }

    /// A ranking query carrying the configured page size.
    pub fn ranking_query(&self, metric: impl Into<String>) -> RankingQuery {
        RankingQuery::new(metric).with_page(1, self.config.aggregation.page_size)
    }

    pub fn rankings(
        &self,
        records: &[DerivedMetricRecord],
        query: &RankingQuery,
    ) -> Result<RankingPage> {
        rankings(records, query, self.catalog, self.config.aggregation.line_value)
    }

    /// Metrics where a swimmer differs most from the whole team.
    pub fn team_differences(
        &self,
        records: &[DerivedMetricRecord],
        swimmer: &str,
    ) -> Result<Vec<TeamComparison>> {
        let own: Vec<DerivedMetricRecord> = records
            .iter()
            .filter(|r| r.context.swimmer == swimmer)
            .cloned()
            .collect();
        notable_differences(&own, records, self.catalog, self.config.aggregation.top_n)
    }

    /// Score swimmers against each other over one metric group, averaging
    /// each swimmer's records for the given style and distance.
    pub fn compare(
        &self,
        records: &[DerivedMetricRecord],
        swimmers: &[String],
        group: MetricGroup,
        style: Option<&str>,
        distance: Option<u32>,
    ) -> Result<ScoreBoard> {
        let set = ComparisonSet::from_records(records, swimmers, style, distance);
        Scorer::new(self.catalog)
            .with_config(self.config.scoring.clone())
            .score(&set, group)
    }

    /// Metric-by-metric comparison of two races.
    pub fn head_to_head(
        &self,
        first: &DerivedMetricRecord,
        second: &DerivedMetricRecord,
    ) -> Result<HeadToHead> {
        head_to_head(first, second, self.catalog)
    }

    pub fn progression(
        &self,
        records: &[DerivedMetricRecord],
        swimmer: &str,
        metric: &str,
        period: Period,
        as_of: NaiveDate,
    ) -> Result<Progression> {
        let definition = self.catalog.get(metric)?;
        Ok(progression(
            records,
            swimmer,
            &definition,
            period,
            as_of,
            self.config.aggregation.stable_threshold,
        ))
    }
}

impl Default for Aqualytics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregationConfig;
    use crate::error::AquaError;

    const CSV: &str = "\
fecha,nadador,competencia,distancia,estilo,fase,t15_1,brz_1,t25_1,f1,t15_2,brz_2,t25_2,f2,t_total,brz_total
2024-03-10,Ana,Copa,50,libre,final,6.1,10,12.5,11,7.0,12,14.0,7,26.5,22
2024-03-10,Luis,Copa,50,libre,final,6.4,11,13.0,10,7.2,13,14.5,6,27.5,24
2024-04-14,Ana,Liga,50,libre,final,6.0,10,12.3,11,6.9,12,13.8,7,26.1,22
";

    #[test]
    fn test_import_and_aggregate() {
        let aqua = Aqualytics::new();
        let result = aqua.import(CSV);
        assert!(result.is_clean());
        assert_eq!(result.records.len(), 3);

        let bests = aqua.personal_bests(&result.records, "Ana").unwrap();
        let total = bests.iter().find(|b| b.metric == "t_total").unwrap();
        assert_eq!(total.value, 26.1);

        let page = aqua
            .rankings(&result.records, &aqua.ranking_query("t_total"))
            .unwrap();
        assert_eq!(page.entries[0].line.swimmer, "Ana");
        assert_eq!(page.total, 2);
    }

    #[test]
    fn test_compare_and_progression() {
        let aqua = Aqualytics::new();
        let records = aqua.import(CSV).records;

        let swimmers = vec!["Ana".to_string(), "Luis".to_string()];
        let board = aqua
            .compare(&records, &swimmers, MetricGroup::Tiempo, Some("libre"), Some(50))
            .unwrap();
        assert!(board.applicable);
        assert_eq!(board.members[0].swimmer, "Ana");

        let as_of = NaiveDate::from_ymd_opt(2024, 4, 30).unwrap();
        let prog = aqua
            .progression(&records, "Ana", "t_total", Period::Months3, as_of)
            .unwrap();
        assert_eq!(prog.points.len(), 2);

        let unknown = aqua.progression(&records, "Ana", "speed", Period::All, as_of);
        assert!(matches!(unknown, Err(AquaError::UnknownMetric(_))));
    }

    #[test]
    fn test_segments_bounded_by_max_distance() {
        let aqua = Aqualytics::new();
        assert_eq!(aqua.segments(1500, CourseLength::Long).unwrap().segments.len(), 30);
        assert!(matches!(
            aqua.segments(100_000_000, CourseLength::Short),
            Err(AquaError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_configured_defaults_flow_through() {
        let config = AnalyticsConfig::default()
            .with_aggregation(AggregationConfig::default().with_top_n(1).with_page_size(7));
        let aqua = Aqualytics::with_config(config);

        assert_eq!(aqua.ranking_query("v_promedio").page_size, 7);

        let records = aqua.import(CSV).records;
        let diffs = aqua.team_differences(&records, "Luis").unwrap();
        assert_eq!(diffs.len(), 1);
    }
}
