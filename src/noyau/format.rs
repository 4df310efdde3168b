// src/noyau/format.rs
//
// Affichage des nombres (fixe / scientifique) + lecture inverse.
//
// Forme scientifique interne : "<mantisse> x10^<exposant>"
// - la mantisse garde son signe
// - l’exposant peut être négatif, jamais de '+'
// - analyser() doit relire tout ce que formater() produit

use std::fmt;

use thiserror::Error;

/// Marque d’exposant dans le tampon d’affichage.
pub const MARQUE_EXPOSANT: &str = " x10^";

/// Au-delà : notation scientifique forcée.
const SEUIL_GRAND: f64 = 1e7;

/// En-deçà (hors zéro) : notation scientifique forcée.
const SEUIL_PETIT: f64 = 1e-4;

/// Chiffres de mantisse pour l’aperçu “pleine précision”.
pub const CHIFFRES_PRECISION_COMPLETE: usize = 11;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("nombre invalide: {texte:?}")]
pub struct ErreurAnalyse {
    pub texte: String,
}

/* ------------------------ Nombre -> texte ------------------------ */

/// Rend `valeur` avec `decimales` chiffres après la virgule (fixe ou mantisse).
pub fn formater(valeur: f64, decimales: usize, scientifique: bool) -> String {
    if let Some(s) = formater_special(valeur) {
        return s;
    }

    let abs = valeur.abs();
    if scientifique || abs >= SEUIL_GRAND || (abs > 0.0 && abs <= SEUIL_PETIT) {
        formater_scientifique(valeur, decimales)
    } else {
        // -0 s’affiche 0
        let valeur = if valeur == 0.0 { 0.0 } else { valeur };
        format!("{valeur:.decimales$}")
    }
}

/// Aperçu ponctuel : toujours scientifique, 11 chiffres de mantisse.
pub fn formater_precision_complete(valeur: f64) -> String {
    formater_special(valeur)
        .unwrap_or_else(|| formater_scientifique(valeur, CHIFFRES_PRECISION_COMPLETE))
}

fn formater_scientifique(valeur: f64, decimales: usize) -> String {
    let valeur = if valeur == 0.0 { 0.0 } else { valeur };
    // Rust: "1.2340e7" / "1.2340e-5"
    let brut = format!("{valeur:.decimales$e}");
    match brut.split_once('e') {
        Some((mantisse, exposant)) => format!("{mantisse}{MARQUE_EXPOSANT}{exposant}"),
        None => brut,
    }
}

/// Forme sans perte (persistance) : relue à l’identique par `analyser`, NaN/Infinity compris.
pub fn formater_exact(valeur: f64) -> String {
    formater_special(valeur).unwrap_or_else(|| format!("{valeur:?}"))
}

fn formater_special(valeur: f64) -> Option<String> {
    if valeur.is_nan() {
        Some("NaN".to_string())
    } else if valeur.is_infinite() {
        Some(if valeur > 0.0 { "Infinity" } else { "-Infinity" }.to_string())
    } else {
        None
    }
}

/* ------------------------ Texte -> nombre ------------------------ */

/// Inverse de `formater` (accepte aussi la forme fixe et les littéraux NaN/Infinity).
pub fn analyser(texte: &str) -> Result<f64, ErreurAnalyse> {
    let t = texte.trim();
    let normalise = match t.split_once(MARQUE_EXPOSANT) {
        Some((mantisse, exposant)) => format!("{mantisse}e{exposant}"),
        None => t.to_string(),
    };

    normalise.parse::<f64>().map_err(|_| ErreurAnalyse {
        texte: texte.to_string(),
    })
}

/* ------------------------ Saisie d’exposant ------------------------ */

/// Tampon en cours d’édition d’exposant, découpé en morceaux modifiables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Exposant {
    pub mantisse: String,
    pub negatif: bool,
    pub chiffres: String,
}

impl Exposant {
    /// Nouvel exposant "0" accroché à `mantisse`.
    pub fn nouveau(mantisse: &str) -> Self {
        Self {
            mantisse: mantisse.to_string(),
            negatif: false,
            chiffres: "0".to_string(),
        }
    }

    /// Découpe un tampon "<mantisse> x10^[-]<chiffres>".
    pub fn depuis_tampon(tampon: &str) -> Option<Self> {
        let (mantisse, exposant) = tampon.split_once(MARQUE_EXPOSANT)?;
        let (negatif, chiffres) = match exposant.strip_prefix('-') {
            Some(reste) => (true, reste),
            None => (false, exposant),
        };
        if !chiffres.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        Some(Self {
            mantisse: mantisse.to_string(),
            negatif,
            chiffres: chiffres.to_string(),
        })
    }

    /// Ajoute un chiffre (le "0" initial est remplacé).
    pub fn ajouter_chiffre(&mut self, chiffre: char) {
        if self.chiffres == "0" {
            self.chiffres.clear();
        }
        self.chiffres.push(chiffre);
    }

    pub fn changer_signe(&mut self) {
        self.negatif = !self.negatif;
    }
}

impl fmt::Display for Exposant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let signe = if self.negatif { "-" } else { "" };
        write!(f, "{}{MARQUE_EXPOSANT}{signe}{}", self.mantisse, self.chiffres)
    }
}
