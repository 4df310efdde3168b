// src/noyau/pile.rs
//
// Pile à quatre registres [X, Y, Z, T] + tampon texte de X.
//
// Règles:
// - toujours exactement 4 valeurs (tableau fixe)
// - toute mutation recalcule le tampon depuis X (sauf édition en cours)
// - le tampon peut contenir une saisie partielle ou une invite ("Reg 0-9:")

use super::format::{analyser, formater};
use super::reglages::Format;

pub const TAILLE_PILE: usize = 4;

#[derive(Clone, Debug)]
pub struct Pile {
    valeurs: [f64; TAILLE_PILE],
    tampon: String,
}

impl Pile {
    pub fn new(format: Format) -> Self {
        Self::depuis_valeurs([0.0; TAILLE_PILE], format)
    }

    pub fn depuis_valeurs(valeurs: [f64; TAILLE_PILE], format: Format) -> Self {
        let mut pile = Self {
            valeurs,
            tampon: String::new(),
        };
        pile.rafraichir(format);
        pile
    }

    pub fn valeurs(&self) -> [f64; TAILLE_PILE] {
        self.valeurs
    }

    pub fn x(&self) -> f64 {
        self.valeurs[0]
    }

    pub fn y(&self) -> f64 {
        self.valeurs[1]
    }

    pub fn tampon(&self) -> &str {
        &self.tampon
    }

    /* ------------------------ Mélanges ------------------------ */

    /// Consomme X et Y ; le bas de pile se duplique.
    pub fn remplacer_xy(&mut self, valeur: f64, format: Format) {
        let [_, _, z, t] = self.valeurs;
        self.valeurs = [valeur, z, t, t];
        self.rafraichir(format);
    }

    pub fn remplacer_x(&mut self, valeur: f64, format: Format) {
        self.valeurs[0] = valeur;
        self.rafraichir(format);
    }

    /// "enter" : X recopié en Y, T perdu.
    pub fn entrer(&mut self, format: Format) {
        let x = self.valeurs[0];
        self.pousser(x, format);
    }

    /// Nouveau X sans consommer l’ancien (constantes, rappel mémoire).
    pub fn nouveau_x(&mut self, valeur: f64, format: Format) {
        self.pousser(valeur, format);
    }

    pub fn echanger_xy(&mut self, format: Format) {
        self.valeurs.swap(0, 1);
        self.rafraichir(format);
    }

    /// X part en T, Y devient X.
    pub fn rouler_bas(&mut self, format: Format) {
        self.valeurs.rotate_left(1);
        self.rafraichir(format);
    }

    /// T remonte en X.
    pub fn rouler_haut(&mut self, format: Format) {
        self.valeurs.rotate_right(1);
        self.rafraichir(format);
    }

    pub fn effacer(&mut self, format: Format) {
        self.valeurs = [0.0; TAILLE_PILE];
        self.rafraichir(format);
    }

    fn pousser(&mut self, valeur: f64, format: Format) {
        self.valeurs.rotate_right(1);
        self.valeurs[0] = valeur;
        self.rafraichir(format);
    }

    /* ------------------------ Tampon ------------------------ */

    /// Tampon <- X formaté.
    pub fn rafraichir(&mut self, format: Format) {
        self.tampon = formater(self.valeurs[0], format.decimales, format.scientifique);
    }

    /// Remplace le tampon sans toucher X (invites).
    pub fn definir_tampon(&mut self, texte: &str) {
        self.tampon = texte.to_string();
    }

    /// Saisie : tampon + X, seulement si le texte se relit.
    /// Retourne false (rien modifié) sinon.
    pub fn saisir(&mut self, texte: String) -> bool {
        match analyser(&texte) {
            Ok(v) => {
                self.valeurs[0] = v;
                self.tampon = texte;
                true
            }
            Err(_) => false,
        }
    }

    /// Registres T, Z, Y (du haut vers le bas), un par ligne.
    pub fn texte_registres(&self, format: Format) -> String {
        self.valeurs[1..]
            .iter()
            .rev()
            .map(|v| formater(*v, format.decimales, format.scientifique))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
