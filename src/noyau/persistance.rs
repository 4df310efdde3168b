// src/noyau/persistance.rs
//
// Frontière de persistance (port) : un magasin clé -> texte, façon localStorage.
//
// Contrats:
// - le chargement n’échoue JAMAIS : champ absent ou corrompu => valeur par défaut
// - chaque champ est validé seul (une mémoire corrompue n’invalide pas l’unité d’angle)
// - tableaux (mémoire, pile) en JSON : longueur exacte + nombres seulement
// - chaque nombre est écrit en texte sans perte ("Infinity", "NaN" survivent au redémarrage) ;
//   les nombres JSON nus restent acceptés à la lecture
// - une écriture ratée n’empêche pas les suivantes

use std::collections::BTreeMap;

use serde::Deserialize;
use thiserror::Error;
use tracing::warn;

use super::format::{analyser, formater_exact};
use super::memoire::{Memoire, NB_REGISTRES};
use super::pile::TAILLE_PILE;
use super::reglages::{Reglages, UniteAngle, DECIMALES_MAX};

/// Clés du magasin.
pub mod cles {
    pub const UNITE_ANGLE: &str = "angleunit";
    pub const DECIMALES: &str = "decplaces";
    pub const SCIENTIFIQUE: &str = "scinotation";
    pub const REGISTRES: &str = "showreg";
    pub const CONSERVER_PILE: &str = "storestack";
    pub const MEMOIRE: &str = "memory";
    pub const PILE: &str = "stack";
}

#[derive(Debug, Error)]
pub enum ErreurStockage {
    #[error("E/S: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("stockage navigateur: {0}")]
    Navigateur(String),
}

/// Magasin clé -> texte.
pub trait Stockage {
    fn lire(&self, cle: &str) -> Option<String>;
    fn ecrire(&mut self, cle: &str, valeur: &str) -> Result<(), ErreurStockage>;
}

impl<T: Stockage + ?Sized> Stockage for Box<T> {
    fn lire(&self, cle: &str) -> Option<String> {
        (**self).lire(cle)
    }

    fn ecrire(&mut self, cle: &str, valeur: &str) -> Result<(), ErreurStockage> {
        (**self).ecrire(cle, valeur)
    }
}

/// Magasin en mémoire (tests, ou repli quand rien d’autre n’est disponible).
#[derive(Clone, Debug, Default)]
pub struct StockageMemoire {
    entrees: BTreeMap<String, String>,
}

impl StockageMemoire {
    pub fn avec(entrees: &[(&str, &str)]) -> Self {
        Self {
            entrees: entrees
                .iter()
                .map(|(c, v)| (c.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl Stockage for StockageMemoire {
    fn lire(&self, cle: &str) -> Option<String> {
        self.entrees.get(cle).cloned()
    }

    fn ecrire(&mut self, cle: &str, valeur: &str) -> Result<(), ErreurStockage> {
        self.entrees.insert(cle.to_string(), valeur.to_string());
        Ok(())
    }
}

/* ------------------------ Chargement ------------------------ */

/// Réglages + mémoire ; tout champ invalide garde sa valeur par défaut.
pub fn charger_reglages<S: Stockage + ?Sized>(stockage: &S) -> (Reglages, Memoire) {
    let mut r = Reglages::default();

    if let Some(texte) = stockage.lire(cles::UNITE_ANGLE) {
        match texte.parse::<UniteAngle>() {
            Ok(u) => r.unite_angle = u,
            Err(e) => warn!(cle = cles::UNITE_ANGLE, "réglage ignoré: {e}"),
        }
    }

    if let Some(texte) = stockage.lire(cles::DECIMALES) {
        match texte.trim().parse::<u8>() {
            Ok(d) if d <= DECIMALES_MAX => r.decimales = d,
            _ => warn!(cle = cles::DECIMALES, valeur = %texte, "réglage ignoré"),
        }
    }

    charger_booleen(stockage, cles::SCIENTIFIQUE, &mut r.scientifique);
    charger_booleen(stockage, cles::REGISTRES, &mut r.afficher_registres);
    charger_booleen(stockage, cles::CONSERVER_PILE, &mut r.conserver_pile);

    let memoire = lire_nombres::<S, NB_REGISTRES>(stockage, cles::MEMOIRE)
        .map(Memoire::depuis)
        .unwrap_or_default();

    (r, memoire)
}

/// Pile sauvegardée, si présente et valide.
pub fn charger_pile<S: Stockage + ?Sized>(stockage: &S) -> Option<[f64; TAILLE_PILE]> {
    lire_nombres::<S, TAILLE_PILE>(stockage, cles::PILE)
}

fn charger_booleen<S: Stockage + ?Sized>(stockage: &S, cle: &str, cible: &mut bool) {
    if let Some(texte) = stockage.lire(cle) {
        match texte.as_str() {
            "true" => *cible = true,
            "false" => *cible = false,
            _ => warn!(cle, valeur = %texte, "réglage ignoré"),
        }
    }
}

/// Entrée de tableau : texte relu par `analyser`, ou nombre JSON nu.
#[derive(Deserialize)]
#[serde(untagged)]
enum Nombre {
    Valeur(f64),
    Texte(String),
}

fn lire_nombres<S: Stockage + ?Sized, const N: usize>(stockage: &S, cle: &str) -> Option<[f64; N]> {
    let texte = stockage.lire(cle)?;
    let entrees: Vec<Nombre> = match serde_json::from_str(&texte) {
        Ok(v) => v,
        Err(e) => {
            warn!(cle, "donnée ignorée: {e}");
            return None;
        }
    };

    let mut nombres = Vec::with_capacity(entrees.len());
    for entree in entrees {
        match entree {
            Nombre::Valeur(v) => nombres.push(v),
            Nombre::Texte(t) => match analyser(&t) {
                Ok(v) => nombres.push(v),
                Err(e) => {
                    warn!(cle, "donnée ignorée: {e}");
                    return None;
                }
            },
        }
    }

    let longueur = nombres.len();
    match <[f64; N]>::try_from(nombres) {
        Ok(tableau) => Some(tableau),
        Err(_) => {
            warn!(cle, longueur, attendu = N, "donnée ignorée: mauvaise longueur");
            None
        }
    }
}

/* ------------------------ Sauvegarde ------------------------ */

/// Tente toutes les clés ; rend la première erreur rencontrée.
pub fn sauver_reglages<S: Stockage + ?Sized>(
    stockage: &mut S,
    reglages: &Reglages,
    memoire: &Memoire,
) -> Result<(), ErreurStockage> {
    let entrees = [
        (cles::UNITE_ANGLE, reglages.unite_angle.code().to_string()),
        (cles::DECIMALES, reglages.decimales.to_string()),
        (cles::SCIENTIFIQUE, reglages.scientifique.to_string()),
        (cles::REGISTRES, reglages.afficher_registres.to_string()),
        (cles::CONSERVER_PILE, reglages.conserver_pile.to_string()),
        (cles::MEMOIRE, texte_nombres(memoire.registres())?),
    ];

    let mut premiere = None;
    for (cle, valeur) in &entrees {
        if let Err(e) = stockage.ecrire(cle, valeur) {
            warn!(cle, "écriture ratée: {e}");
            premiere.get_or_insert(e);
        }
    }
    premiere.map_or(Ok(()), Err)
}

pub fn sauver_pile<S: Stockage + ?Sized>(
    stockage: &mut S,
    valeurs: &[f64; TAILLE_PILE],
) -> Result<(), ErreurStockage> {
    stockage.ecrire(cles::PILE, &texte_nombres(valeurs)?)
}

fn texte_nombres(valeurs: &[f64]) -> Result<String, ErreurStockage> {
    let textes: Vec<String> = valeurs.iter().map(|v| formater_exact(*v)).collect();
    Ok(serde_json::to_string(&textes)?)
}
