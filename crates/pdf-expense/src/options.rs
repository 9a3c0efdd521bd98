use crate::constants::{DEFAULT_RATE_PER_KM, MAX_LOGO_SLOTS};
use crate::types::*;
use std::path::PathBuf;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Contact block printed on the left under the logos
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ContactBlock {
    pub title: String,
    pub lines: Vec<String>,
}

/// Report configuration: pricing and the fixed texts of the recap page
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ReportOptions {
    // Pricing
    pub rate_per_km: f64,

    // Branding
    pub logos: Vec<PathBuf>,
    pub header_lines: Vec<String>,
    pub contact: Option<ContactBlock>,

    // Titles and fixed text
    pub title: String,
    pub subtitle: String,
    pub rules: Vec<String>,
    pub certification: String,
    pub waiver_text: String,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            rate_per_km: DEFAULT_RATE_PER_KM,
            logos: Vec::new(),
            header_lines: vec![
                "Ligue Bourgogne-Franche-Comté de Course d'Orientation".to_string(),
                "Émail : ligue.bourgogne-franche-comte@ffcorientation.fr".to_string(),
            ],
            contact: None,
            title: "ANNEXE I".to_string(),
            subtitle: "État de remboursement des frais de déplacement pour mission".to_string(),
            rules: vec![
                "Utiliser un seul état par déplacement ou mission à envoyer par courrier au trésorier (email : compta.bfco@gmail.com) dans le mois qui suit la mission (accompagné d'un RIB).".to_string(),
                "Joindre les justificatifs (invitation - péage - etc...).".to_string(),
                "- L'indemnité est fixée chaque année par le Comité Directeur (0,30€/km). Elle peut être modifiée par anticipation lors d'un Comité Directeur si le besoin s'en fait sentir.".to_string(),
                "- Frais de péage sur justificatif.".to_string(),
                "- Frais de restauration : remboursement sur justificatif plafonné à 18,00 € par repas.".to_string(),
                "- Frais d'hébergement : remboursement sur facture plafonné à 40,00 € par nuitée et 8,00€ pour le petit déjeuner.".to_string(),
            ],
            certification: "Je certifie ne pas me faire rembourser mes frais plusieurs fois."
                .to_string(),
            waiver_text: "Je renonce au paiement de ces indemnités".to_string(),
        }
    }
}

impl ReportOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ReportError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ReportError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    /// Validate the options
    pub fn validate(&self) -> Result<()> {
        if !self.rate_per_km.is_finite() || self.rate_per_km < 0.0 {
            return Err(ReportError::Config(format!(
                "Rate per km must be a non-negative number, got {}",
                self.rate_per_km
            )));
        }

        if self.logos.len() > MAX_LOGO_SLOTS {
            return Err(ReportError::Config(format!(
                "At most {} logos fit in the header, got {}",
                MAX_LOGO_SLOTS,
                self.logos.len()
            )));
        }

        if self.header_lines.len() > 2 {
            return Err(ReportError::Config(
                "The header holds at most 2 centered lines".to_string(),
            ));
        }

        Ok(())
    }
}
