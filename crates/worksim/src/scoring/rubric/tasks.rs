use serde::{Deserialize, Serialize};

fn words(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| value.to_string()).collect()
}

/// Named criterion weights of one task rubric; every table must sum to 1.0.
pub trait CriterionWeights {
    fn entries(&self) -> Vec<(&'static str, f32)>;

    fn total(&self) -> f32 {
        self.entries().iter().map(|(_, weight)| weight).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CustomerResearchRubric {
    pub weights: CustomerResearchWeights,
    pub keywords: Vec<String>,
    pub min_pain_points: usize,
    pub problem_target_chars: usize,
    pub persona_min_chars: usize,
    /// Ratio credited for a persona shorter than `persona_min_chars`.
    pub short_persona_credit: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CustomerResearchWeights {
    pub problem_clarity: f32,
    pub pain_point_coverage: f32,
    pub pain_point_count: f32,
    pub persona_definition: f32,
}

impl Default for CustomerResearchRubric {
    fn default() -> Self {
        Self {
            weights: CustomerResearchWeights {
                problem_clarity: 0.30,
                pain_point_coverage: 0.30,
                pain_point_count: 0.25,
                persona_definition: 0.15,
            },
            keywords: words(&["battery", "price", "comfort", "durability", "design", "health"]),
            min_pain_points: 3,
            problem_target_chars: 200,
            persona_min_chars: 40,
            short_persona_credit: 0.5,
        }
    }
}

impl CriterionWeights for CustomerResearchWeights {
    fn entries(&self) -> Vec<(&'static str, f32)> {
        vec![
            ("problem_clarity", self.problem_clarity),
            ("pain_point_coverage", self.pain_point_coverage),
            ("pain_point_count", self.pain_point_count),
            ("persona_definition", self.persona_definition),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompetitiveAnalysisRubric {
    pub weights: CompetitiveAnalysisWeights,
    pub keywords: Vec<String>,
    /// Whole words expected in a "For <target> who <need>, <product> is ..." statement.
    pub positioning_markers: Vec<String>,
    pub min_competitors: usize,
    pub depth_target_chars: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompetitiveAnalysisWeights {
    pub competitor_breadth: f32,
    pub differentiation_focus: f32,
    pub positioning_structure: f32,
    pub analysis_depth: f32,
}

impl Default for CompetitiveAnalysisRubric {
    fn default() -> Self {
        Self {
            weights: CompetitiveAnalysisWeights {
                competitor_breadth: 0.25,
                differentiation_focus: 0.35,
                positioning_structure: 0.25,
                analysis_depth: 0.15,
            },
            keywords: words(&["battery", "price", "ecosystem", "design", "health", "warranty"]),
            positioning_markers: words(&["for", "who", "is", "that", "unlike"]),
            min_competitors: 3,
            depth_target_chars: 150,
        }
    }
}

impl CriterionWeights for CompetitiveAnalysisWeights {
    fn entries(&self) -> Vec<(&'static str, f32)> {
        vec![
            ("competitor_breadth", self.competitor_breadth),
            ("differentiation_focus", self.differentiation_focus),
            ("positioning_structure", self.positioning_structure),
            ("analysis_depth", self.analysis_depth),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturePrioritizationRubric {
    pub weights: FeaturePrioritizationWeights,
    pub known_frameworks: Vec<String>,
    pub keywords: Vec<String>,
    pub min_must_have: usize,
    pub max_must_have: usize,
    pub rationale_target_chars: usize,
    /// Points for a framework outside `known_frameworks`.
    pub unknown_framework_points: f32,
    /// Points when the must-have list exceeds `max_must_have`.
    pub overscoped_points: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeaturePrioritizationWeights {
    pub framework_choice: f32,
    pub scope_discipline: f32,
    pub rationale_quality: f32,
    pub rationale_depth: f32,
}

impl Default for FeaturePrioritizationRubric {
    fn default() -> Self {
        Self {
            weights: FeaturePrioritizationWeights {
                framework_choice: 0.20,
                scope_discipline: 0.30,
                rationale_quality: 0.30,
                rationale_depth: 0.20,
            },
            known_frameworks: words(&["rice", "moscow", "kano", "value_effort"]),
            keywords: words(&["customer", "impact", "effort", "data", "risk", "revenue"]),
            min_must_have: 3,
            max_must_have: 5,
            rationale_target_chars: 200,
            unknown_framework_points: 2.0,
            overscoped_points: 3.0,
        }
    }
}

impl CriterionWeights for FeaturePrioritizationWeights {
    fn entries(&self) -> Vec<(&'static str, f32)> {
        vec![
            ("framework_choice", self.framework_choice),
            ("scope_discipline", self.scope_discipline),
            ("rationale_quality", self.rationale_quality),
            ("rationale_depth", self.rationale_depth),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoToMarketRubric {
    pub weights: GoToMarketWeights,
    pub keywords: Vec<String>,
    pub min_channels: usize,
    pub message_min_chars: usize,
    pub message_max_chars: usize,
    pub plan_target_chars: usize,
    pub short_message_points: f32,
    pub long_message_points: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GoToMarketWeights {
    pub channel_mix: f32,
    pub message_clarity: f32,
    pub plan_coverage: f32,
    pub plan_depth: f32,
}

impl Default for GoToMarketRubric {
    fn default() -> Self {
        Self {
            weights: GoToMarketWeights {
                channel_mix: 0.25,
                message_clarity: 0.25,
                plan_coverage: 0.30,
                plan_depth: 0.20,
            },
            keywords: words(&[
                "timeline",
                "launch",
                "influencer",
                "partnership",
                "email",
                "social",
                "retail",
            ]),
            min_channels: 3,
            message_min_chars: 20,
            message_max_chars: 160,
            plan_target_chars: 250,
            short_message_points: 2.0,
            long_message_points: 3.0,
        }
    }
}

impl CriterionWeights for GoToMarketWeights {
    fn entries(&self) -> Vec<(&'static str, f32)> {
        vec![
            ("channel_mix", self.channel_mix),
            ("message_clarity", self.message_clarity),
            ("plan_coverage", self.plan_coverage),
            ("plan_depth", self.plan_depth),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingStrategyRubric {
    pub weights: PricingStrategyWeights,
    pub known_models: Vec<String>,
    pub keywords: Vec<String>,
    pub min_price: f64,
    pub max_price: f64,
    pub justification_target_chars: usize,
    pub unknown_model_points: f32,
    pub unreadable_price_points: f32,
    pub out_of_range_price_points: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricingStrategyWeights {
    pub model_choice: f32,
    pub price_validity: f32,
    pub justification_quality: f32,
    pub justification_depth: f32,
}

impl Default for PricingStrategyRubric {
    fn default() -> Self {
        Self {
            weights: PricingStrategyWeights {
                model_choice: 0.20,
                price_validity: 0.20,
                justification_quality: 0.35,
                justification_depth: 0.25,
            },
            known_models: words(&[
                "premium",
                "penetration",
                "value_based",
                "competitive",
                "freemium",
            ]),
            keywords: words(&["margin", "competitor", "value", "cost", "segment", "elasticity"]),
            min_price: 99.0,
            max_price: 999.0,
            justification_target_chars: 200,
            unknown_model_points: 2.0,
            unreadable_price_points: 1.0,
            out_of_range_price_points: 2.0,
        }
    }
}

impl CriterionWeights for PricingStrategyWeights {
    fn entries(&self) -> Vec<(&'static str, f32)> {
        vec![
            ("model_choice", self.model_choice),
            ("price_validity", self.price_validity),
            ("justification_quality", self.justification_quality),
            ("justification_depth", self.justification_depth),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchMetricsRubric {
    pub weights: LaunchMetricsWeights,
    pub keywords: Vec<String>,
    pub min_kpis: usize,
    pub insight_target_chars: usize,
    pub recommendation_min_chars: usize,
    /// Ratio credited for a recommendation shorter than `recommendation_min_chars`.
    pub short_recommendation_credit: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LaunchMetricsWeights {
    pub kpi_selection: f32,
    pub insight_quality: f32,
    pub insight_depth: f32,
    pub recommendation: f32,
}

impl Default for LaunchMetricsRubric {
    fn default() -> Self {
        Self {
            weights: LaunchMetricsWeights {
                kpi_selection: 0.30,
                insight_quality: 0.30,
                insight_depth: 0.20,
                recommendation: 0.20,
            },
            keywords: words(&["retention", "churn", "conversion", "engagement", "revenue", "nps"]),
            min_kpis: 3,
            insight_target_chars: 200,
            recommendation_min_chars: 60,
            short_recommendation_credit: 0.4,
        }
    }
}

impl CriterionWeights for LaunchMetricsWeights {
    fn entries(&self) -> Vec<(&'static str, f32)> {
        vec![
            ("kpi_selection", self.kpi_selection),
            ("insight_quality", self.insight_quality),
            ("insight_depth", self.insight_depth),
            ("recommendation", self.recommendation),
        ]
    }
}

/// Scoring for submissions to tasks without a dedicated validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackRubric {
    pub weights: FallbackWeights,
    pub detail_target_chars: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FallbackWeights {
    pub completeness: f32,
    pub detail: f32,
}

impl Default for FallbackRubric {
    fn default() -> Self {
        Self {
            weights: FallbackWeights {
                completeness: 0.5,
                detail: 0.5,
            },
            detail_target_chars: 300,
        }
    }
}

impl CriterionWeights for FallbackWeights {
    fn entries(&self) -> Vec<(&'static str, f32)> {
        vec![("completeness", self.completeness), ("detail", self.detail)]
    }
}
