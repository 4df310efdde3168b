//! Noyau RPN à quatre registres
//!
//! Organisation interne :
//! - format.rs      : formatage fixe/scientifique + relecture + saisie d’exposant
//! - reglages.rs    : unité d’angle, décimales, options (réglages persistants)
//! - mode.rs        : modes de saisie (machine à états)
//! - pile.rs        : pile [X, Y, Z, T] + tampon texte de X
//! - memoire.rs     : registres mémoire 0-9
//! - touches.rs     : touches typées (opérateurs, contrôles, libellés)
//! - persistance.rs : port de stockage clé -> texte + validation au chargement
//! - moteur.rs      : dispatch des touches (seul mutateur de l’état)
//! - clavier.rs     : saisie texte -> touches (accumulation de préfixes)

pub mod clavier;
pub mod format;
pub mod memoire;
pub mod mode;
pub mod moteur;
pub mod persistance;
pub mod pile;
pub mod reglages;
pub mod touches;

#[cfg(test)]
mod tests_moteur;

#[cfg(test)]
mod tests_proprietes;

// API publique minimale
pub use clavier::Clavier;
pub use moteur::{Affichage, Moteur};
pub use persistance::{ErreurStockage, Stockage, StockageMemoire};
pub use reglages::{Reglages, UniteAngle};
pub use touches::Touche;
