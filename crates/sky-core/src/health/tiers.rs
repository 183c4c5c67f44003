//! Fixed AQI tier table.
//!
//! Six half-open tiers with inclusive upper bounds 100, 200, 300, 400, 500 and
//! unbounded. Each tier carries exactly four risk entries, listed in the order
//! they are reported.

use sky_common::Severity;

/// A risk entry as stored in the static table.
#[derive(Debug)]
pub struct RiskTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub probability: u8,
    pub severity: Severity,
    pub recommendations: &'static [&'static str],
}

/// One AQI band.
#[derive(Debug)]
pub struct TierSpec {
    /// Inclusive upper bound; `None` for the top tier.
    pub upper: Option<i64>,
    pub label: &'static str,
    pub risks: [RiskTemplate; 4],
}

const ASTHMA: &str = "Asthma & Allergies";
const RESPIRATORY: &str = "Respiratory Diseases";
const CARDIO: &str = "Cardiovascular Diseases";
const IRRITATION: &str = "Eye & Throat Irritation";

pub static TIERS: [TierSpec; 6] = [
    TierSpec {
        upper: Some(100),
        label: "Good",
        risks: [
            RiskTemplate {
                name: ASTHMA,
                description: "Air quality is acceptable; only unusually sensitive people may notice mild symptoms.",
                probability: 10,
                severity: Severity::Low,
                recommendations: &[
                    "Enjoy normal outdoor activities",
                    "Keep reliever inhalers at hand if you are asthmatic",
                    "Ventilate indoor spaces while air is clean",
                ],
            },
            RiskTemplate {
                name: RESPIRATORY,
                description: "Particle levels pose little or no respiratory risk.",
                probability: 5,
                severity: Severity::Good,
                recommendations: &[
                    "No precautions needed",
                    "Outdoor exercise is safe",
                    "Keep monitoring during long exposures",
                ],
            },
            RiskTemplate {
                name: CARDIO,
                description: "No measurable cardiovascular strain expected at this level.",
                probability: 5,
                severity: Severity::Good,
                recommendations: &[
                    "Maintain regular activity",
                    "Stay hydrated",
                    "Continue prescribed medication as usual",
                ],
            },
            RiskTemplate {
                name: IRRITATION,
                description: "Eye and throat irritation is unlikely.",
                probability: 5,
                severity: Severity::Good,
                recommendations: &[
                    "No action required",
                    "Use lubricating drops if your eyes are dry",
                    "Keep windows open for fresh air",
                ],
            },
        ],
    },
    TierSpec {
        upper: Some(200),
        label: "Moderate",
        risks: [
            RiskTemplate {
                name: ASTHMA,
                description: "Sensitive groups may experience wheezing or allergy flare-ups.",
                probability: 35,
                severity: Severity::Moderate,
                recommendations: &[
                    "Asthmatics should carry a reliever inhaler",
                    "Limit prolonged outdoor exertion",
                    "Keep windows closed during peak traffic hours",
                ],
            },
            RiskTemplate {
                name: RESPIRATORY,
                description: "Prolonged exposure can cause coughing and mild airway inflammation.",
                probability: 30,
                severity: Severity::Moderate,
                recommendations: &[
                    "Reduce long or intense outdoor workouts",
                    "Take breaks indoors",
                    "Watch for persistent coughing",
                ],
            },
            RiskTemplate {
                name: CARDIO,
                description: "People with heart conditions may notice slight strain.",
                probability: 20,
                severity: Severity::Low,
                recommendations: &[
                    "Heart patients should avoid heavy exertion",
                    "Monitor blood pressure",
                    "Stay hydrated",
                ],
            },
            RiskTemplate {
                name: IRRITATION,
                description: "Mild eye and throat irritation is possible.",
                probability: 25,
                severity: Severity::Low,
                recommendations: &[
                    "Rinse eyes with clean water after outdoor exposure",
                    "Drink warm fluids",
                    "Avoid rubbing your eyes",
                ],
            },
        ],
    },
    TierSpec {
        upper: Some(300),
        label: "Unhealthy for Sensitive Groups",
        risks: [
            RiskTemplate {
                name: ASTHMA,
                description: "Asthma attacks become more likely for sensitive individuals.",
                probability: 60,
                severity: Severity::High,
                recommendations: &[
                    "Sensitive groups should stay indoors",
                    "Follow your asthma action plan",
                    "Wear an N95 mask outdoors",
                    "Run an air purifier indoors",
                ],
            },
            RiskTemplate {
                name: RESPIRATORY,
                description: "Airway inflammation and shortness of breath are increasingly common.",
                probability: 50,
                severity: Severity::High,
                recommendations: &[
                    "Avoid outdoor exercise",
                    "Wear an N95 mask when outside",
                    "Keep doors and windows closed",
                ],
            },
            RiskTemplate {
                name: CARDIO,
                description: "Fine particles raise cardiovascular stress in at-risk groups.",
                probability: 40,
                severity: Severity::Moderate,
                recommendations: &[
                    "Elderly and heart patients should limit exertion",
                    "Keep emergency medication accessible",
                    "Monitor for chest discomfort",
                ],
            },
            RiskTemplate {
                name: IRRITATION,
                description: "Eye watering and sore throat are likely during outdoor exposure.",
                probability: 45,
                severity: Severity::Moderate,
                recommendations: &[
                    "Wear protective glasses outdoors",
                    "Use saline nasal rinses",
                    "Stay hydrated",
                ],
            },
        ],
    },
    TierSpec {
        upper: Some(400),
        label: "Unhealthy",
        risks: [
            RiskTemplate {
                name: ASTHMA,
                description: "Everyone may experience symptoms; asthmatics face frequent attacks.",
                probability: 75,
                severity: Severity::Severe,
                recommendations: &[
                    "Stay indoors with windows closed",
                    "Run air purifiers on high",
                    "Consult a doctor if symptoms worsen",
                    "Wear an N95 mask for any outdoor trip",
                ],
            },
            RiskTemplate {
                name: RESPIRATORY,
                description: "Significant risk of bronchitis and reduced lung function.",
                probability: 70,
                severity: Severity::Severe,
                recommendations: &[
                    "Avoid all outdoor physical activity",
                    "Use an N95 or better respirator outside",
                    "Seek care for breathing difficulty",
                ],
            },
            RiskTemplate {
                name: CARDIO,
                description: "Elevated risk of arrhythmia and blood pressure spikes.",
                probability: 55,
                severity: Severity::High,
                recommendations: &[
                    "Heart patients should remain indoors",
                    "Avoid strenuous activity",
                    "Keep medication and emergency contacts ready",
                ],
            },
            RiskTemplate {
                name: IRRITATION,
                description: "Persistent eye, nose, and throat irritation for most people.",
                probability: 60,
                severity: Severity::High,
                recommendations: &[
                    "Limit time outdoors",
                    "Use lubricating eye drops",
                    "Gargle with warm salt water",
                ],
            },
        ],
    },
    TierSpec {
        upper: Some(500),
        label: "Very Unhealthy",
        risks: [
            RiskTemplate {
                name: ASTHMA,
                description: "Health alert: severe asthma and allergy reactions are widespread.",
                probability: 90,
                severity: Severity::Critical,
                recommendations: &[
                    "Remain indoors in a filtered room",
                    "Keep rescue medication within reach",
                    "Seek medical help at the first sign of an attack",
                ],
            },
            RiskTemplate {
                name: RESPIRATORY,
                description: "Serious respiratory effects are likely for the whole population.",
                probability: 85,
                severity: Severity::Critical,
                recommendations: &[
                    "Do not exercise outdoors",
                    "Seal gaps around doors and windows",
                    "Wear a well-fitted N95 respirator if you must go out",
                ],
            },
            RiskTemplate {
                name: CARDIO,
                description: "High risk of heart attack or stroke in vulnerable individuals.",
                probability: 75,
                severity: Severity::Severe,
                recommendations: &[
                    "Vulnerable people should avoid all exertion",
                    "Watch for chest pain or palpitations",
                    "Have an emergency plan ready",
                ],
            },
            RiskTemplate {
                name: IRRITATION,
                description: "Strong irritation of eyes and airways even after short exposure.",
                probability: 70,
                severity: Severity::Severe,
                recommendations: &[
                    "Stay indoors",
                    "Wear sealed goggles if outdoors",
                    "Flush eyes with clean water after exposure",
                ],
            },
        ],
    },
    TierSpec {
        upper: None,
        label: "Hazardous",
        risks: [
            RiskTemplate {
                name: ASTHMA,
                description: "Emergency conditions: life-threatening asthma attacks are possible.",
                probability: 98,
                severity: Severity::Emergency,
                recommendations: &[
                    "Stay indoors and run air purification continuously",
                    "Evacuate the area if advised by authorities",
                    "Call emergency services for severe attacks",
                    "Do not go outside without a respirator",
                ],
            },
            RiskTemplate {
                name: RESPIRATORY,
                description: "Emergency conditions: acute respiratory distress across the population.",
                probability: 95,
                severity: Severity::Emergency,
                recommendations: &[
                    "Avoid all outdoor exposure",
                    "Use a P100 or N95 respirator if you must leave shelter",
                    "Seek immediate care for breathing difficulty",
                ],
            },
            RiskTemplate {
                name: CARDIO,
                description: "Severe cardiovascular stress for everyone, critical for heart patients.",
                probability: 90,
                severity: Severity::Critical,
                recommendations: &[
                    "Rest indoors and avoid any exertion",
                    "Keep emergency medication on hand",
                    "Call emergency services for chest pain",
                ],
            },
            RiskTemplate {
                name: IRRITATION,
                description: "Severe burning of eyes and throat is expected.",
                probability: 80,
                severity: Severity::Critical,
                recommendations: &[
                    "Remain in sealed, filtered indoor spaces",
                    "Wear goggles and a respirator outdoors",
                    "Seek care if vision or swallowing is affected",
                ],
            },
        ],
    },
];
