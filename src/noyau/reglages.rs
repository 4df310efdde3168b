// src/noyau/reglages.rs
//
// Réglages d’affichage (persistés) :
// - unité d’angle (deg -> rad -> grad -> deg)
// - nombre de décimales [0, 9]
// - notation scientifique forcée
// - registres Y/Z/T visibles
// - pile conservée entre deux sessions

use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;

/// Borne haute des décimales (un seul chiffre au clavier).
pub const DECIMALES_MAX: u8 = 9;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UniteAngle {
    #[default]
    Degres,
    Radians,
    Grades,
}

impl UniteAngle {
    pub const TOUTES: [UniteAngle; 3] = [UniteAngle::Degres, UniteAngle::Radians, UniteAngle::Grades];

    /// Cycle de la touche "deg".
    pub fn suivante(self) -> Self {
        match self {
            UniteAngle::Degres => UniteAngle::Radians,
            UniteAngle::Radians => UniteAngle::Grades,
            UniteAngle::Grades => UniteAngle::Degres,
        }
    }

    /// Radians par unité.
    pub fn facteur(self) -> f64 {
        match self {
            UniteAngle::Degres => PI / 180.0,
            UniteAngle::Radians => 1.0,
            UniteAngle::Grades => PI / 200.0,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            UniteAngle::Degres => "deg",
            UniteAngle::Radians => "rad",
            UniteAngle::Grades => "grad",
        }
    }
}

impl fmt::Display for UniteAngle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for UniteAngle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        UniteAngle::TOUTES
            .into_iter()
            .find(|u| u.code() == s)
            .ok_or_else(|| format!("unité d’angle inconnue: {s:?}"))
    }
}

/// Ce dont la pile a besoin pour rendre X.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Format {
    pub decimales: usize,
    pub scientifique: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Reglages {
    pub unite_angle: UniteAngle,
    pub decimales: u8,
    pub scientifique: bool,
    pub afficher_registres: bool,
    pub conserver_pile: bool,
}

impl Default for Reglages {
    fn default() -> Self {
        Self {
            unite_angle: UniteAngle::Degres,
            decimales: 4,
            scientifique: false,
            afficher_registres: true,
            conserver_pile: true,
        }
    }
}

impl Reglages {
    pub fn format(&self) -> Format {
        Format {
            decimales: usize::from(self.decimales.min(DECIMALES_MAX)),
            scientifique: self.scientifique,
        }
    }

    /// Ligne d’état : "fix 4 deg", "sci 2 rad"...
    pub fn statut(&self) -> String {
        let notation = if self.scientifique { "sci" } else { "fix" };
        format!("{notation} {} {}", self.decimales, self.unite_angle)
    }
}
