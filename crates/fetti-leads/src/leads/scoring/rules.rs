use super::config::ScoringConfig;
use super::{ScoreComponent, ScoreFactor};
use crate::leads::domain::{CanonicalField, LeadRecord};

const BASE_POINTS: i32 = 10;

/// Additive batch rubric. Assumes the record already passed the hard filters.
pub(crate) fn score_components(record: &LeadRecord, config: &ScoringConfig) -> Vec<ScoreComponent> {
    let mut components = vec![ScoreComponent::new(
        ScoreFactor::Base,
        BASE_POINTS,
        "passed product and threshold filters",
    )];

    components.extend(state_component(record, config));

    if let Some(value) = record.number(CanonicalField::PropertyValue) {
        let points = property_value_points(value);
        if points > 0 {
            components.push(ScoreComponent::new(
                ScoreFactor::PropertyValue,
                points,
                format!("property value ${value:.0}"),
            ));
        }
    }

    if let Some(score) = record.number(CanonicalField::CreditScore) {
        components.push(ScoreComponent::new(
            ScoreFactor::CreditScore,
            credit_score_points(score),
            format!("credit score {score:.0}"),
        ));
    }

    if let Some(assets) = record.number(CanonicalField::LiquidAssets) {
        components.push(ScoreComponent::new(
            ScoreFactor::LiquidAssets,
            liquid_asset_points(assets),
            format!("liquid assets ${assets:.0}"),
        ));
    }

    if let Some(cltv) = record.number(CanonicalField::Cltv).filter(|cltv| *cltv >= 0.0) {
        let points = cltv_points(cltv);
        if points > 0 {
            components.push(ScoreComponent::new(
                ScoreFactor::Cltv,
                points,
                format!("CLTV {cltv:.0}%"),
            ));
        }
    }

    components.extend(source_components(record));
    components
}

fn state_component(record: &LeadRecord, config: &ScoringConfig) -> Option<ScoreComponent> {
    let targets = config.target_states();
    if targets.is_empty() {
        return None;
    }

    let state = record.field(CanonicalField::State)?.to_ascii_uppercase();
    if targets.contains(&state) {
        Some(ScoreComponent::new(
            ScoreFactor::StateMatch,
            10,
            format!("{state} is a target state"),
        ))
    } else {
        Some(ScoreComponent::new(
            ScoreFactor::StateMatch,
            -5,
            format!("{state} is outside target states"),
        ))
    }
}

fn property_value_points(value: f64) -> i32 {
    if (250_000.0..=900_000.0).contains(&value) {
        15
    } else if value > 900_000.0 && value <= 2_000_000.0 {
        12
    } else if value > 2_000_000.0 {
        8
    } else if value >= 150_000.0 {
        5
    } else {
        0
    }
}

fn credit_score_points(score: f64) -> i32 {
    if score >= 740.0 {
        15
    } else if score >= 700.0 {
        10
    } else {
        5
    }
}

fn liquid_asset_points(assets: f64) -> i32 {
    if assets >= 150_000.0 {
        15
    } else if assets >= 75_000.0 {
        10
    } else {
        5
    }
}

fn cltv_points(cltv: f64) -> i32 {
    if cltv <= 60.0 {
        15
    } else if cltv <= 75.0 {
        10
    } else if cltv <= 85.0 {
        5
    } else {
        0
    }
}

fn source_components(record: &LeadRecord) -> Vec<ScoreComponent> {
    const SOURCE_BONUSES: &[(&[&str], i32, &str)] = &[
        (&["facebook", "meta"], 5, "paid social lead"),
        (&["google"], 5, "search lead"),
        (&["data_vendor", "list"], 2, "purchased list lead"),
    ];

    let source = record.text_lower(CanonicalField::Source);
    if source.is_empty() {
        return Vec::new();
    }

    SOURCE_BONUSES
        .iter()
        .filter(|(needles, _, _)| needles.iter().any(|needle| source.contains(needle)))
        .map(|(_, points, note)| {
            ScoreComponent::new(ScoreFactor::Source, *points, format!("{note} ({source})"))
        })
        .collect()
}
