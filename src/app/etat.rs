//! src/app/etat.rs
//!
//! État UI : le moteur, ce qu’il a affiché en dernier, le clavier texte et le formulaire d’options.
//!
//! Contrats :
//! - Aucune logique de calcul ici : tout passe par `Moteur` (seul mutateur).
//! - L’écran n’est rempli que par le port `Affichage` (sortie du moteur).
//! - Le formulaire d’options travaille sur un brouillon, appliqué d’un bloc.

use tracing::info;

use crate::noyau::{Affichage, Clavier, Moteur, Reglages, Stockage, Touche};

/// Bannière montrée dans la ligne de saisie jusqu’à la première touche.
pub fn banniere() -> String {
    format!("rpCalc Version {}", env!("CARGO_PKG_VERSION"))
}

/// Dernier rendu du moteur.
#[derive(Clone, Debug, Default)]
pub struct Ecran {
    pub x: String,
    pub registres: String,
    pub statut: String,
}

impl Affichage for Ecran {
    fn afficher_x(&mut self, texte: &str) {
        self.x = texte.to_string();
    }

    fn afficher_registres(&mut self, texte: &str) {
        self.registres = texte.to_string();
    }

    fn afficher_statut(&mut self, texte: &str) {
        self.statut = texte.to_string();
    }
}

pub struct AppCalc {
    pub moteur: Moteur<Box<dyn Stockage>>,
    pub ecran: Ecran,
    pub clavier: Clavier,

    // --- formulaire d’options ---
    pub options_ouvertes: bool,
    pub brouillon: Reglages,

    /// true tant qu’aucune touche n’a été exécutée.
    pub banniere: bool,
}

impl AppCalc {
    pub fn new(stockage: Box<dyn Stockage>) -> Self {
        let moteur = Moteur::new(stockage);
        let mut ecran = Ecran::default();
        moteur.rendre(&mut ecran);
        info!(statut = %ecran.statut, "{}", banniere());

        Self {
            brouillon: moteur.options(),
            moteur,
            ecran,
            clavier: Clavier::default(),
            options_ouvertes: false,
            banniere: true,
        }
    }

    /* ------------------------ Touches ------------------------ */

    /// Bouton du pavé (libellé de touche).
    pub fn presser_libelle(&mut self, libelle: &str) {
        match libelle.parse::<Touche>() {
            Ok(t) => {
                // un clic abandonne toute saisie texte en cours
                self.clavier = Clavier::default();
                let ok = self.moteur.presser(t, &mut self.ecran);
                self.apres_touche(ok);
            }
            Err(e) => tracing::error!("{e}"),
        }
    }

    /// Caractère tapé au clavier physique.
    pub fn taper(&mut self, car: char) {
        let ok = self.clavier.taper(car, &mut self.moteur, &mut self.ecran);
        self.apres_touche(ok);
    }

    /// Retour arrière physique.
    pub fn retour_arriere_clavier(&mut self) {
        let ok = self
            .clavier
            .retour_arriere(&mut self.moteur, &mut self.ecran);
        self.apres_touche(ok);
    }

    fn apres_touche(&mut self, executee: bool) {
        if executee {
            self.banniere = false;
        }
    }

    /* ------------------------ Options ------------------------ */

    pub fn ouvrir_options(&mut self) {
        self.brouillon = self.moteur.options();
        self.options_ouvertes = true;
    }

    pub fn valider_options(&mut self) {
        self.moteur.appliquer_options(self.brouillon);
        self.moteur.rendre(&mut self.ecran);
        self.options_ouvertes = false;
    }

    pub fn annuler_options(&mut self) {
        self.options_ouvertes = false;
    }

    /* ------------------------ Lecture ------------------------ */

    /// Ligne sous l’afficheur : bannière, puis préfixe clavier en attente.
    pub fn ligne_saisie(&self) -> String {
        if self.banniere && self.clavier.accumule().is_empty() {
            banniere()
        } else {
            self.clavier.accumule().to_string()
        }
    }
}
