// src/noyau/clavier.rs
//
// Saisie au clavier texte : les caractères s’accumulent jusqu’à former une étiquette.
//
// Règles:
// - comparaison insensible à la casse ("SIN" == "sin")
// - étiquette complète ET acceptée par le mode => exécution, accumulateur vidé
// - caractère qui ne peut prolonger aucune étiquette => retiré
// - mode invite (sto/rcl/plcs) => un préfixe en attente est abandonné
// - Entrée ('\r' ou '\n') => "ent" ; retour arrière physique => corrige l’accumulateur,
//   ou envoie "<-" s’il est vide

use super::moteur::{Affichage, Moteur};
use super::persistance::Stockage;
use super::touches::{est_prefixe, Touche};

#[derive(Clone, Debug, Default)]
pub struct Clavier {
    accumule: String,
}

impl Clavier {
    /// Préfixe en attente (affiché dans la ligne de saisie).
    pub fn accumule(&self) -> &str {
        &self.accumule
    }

    /// Retourne true si une touche a été exécutée.
    pub fn taper<S: Stockage>(
        &mut self,
        car: char,
        moteur: &mut Moteur<S>,
        sortie: &mut dyn Affichage,
    ) -> bool {
        let car = if car == '\n' { '\r' } else { car };
        self.accumule.push(car);
        self.traiter(moteur, sortie)
    }

    pub fn retour_arriere<S: Stockage>(
        &mut self,
        moteur: &mut Moteur<S>,
        sortie: &mut dyn Affichage,
    ) -> bool {
        if self.accumule.is_empty() {
            self.accumule.push_str("<-");
        } else {
            self.accumule.pop();
        }
        self.traiter(moteur, sortie)
    }

    fn traiter<S: Stockage>(&mut self, moteur: &mut Moteur<S>, sortie: &mut dyn Affichage) -> bool {
        let cle = self.accumule.to_lowercase();

        if let Some(touche) = Touche::depuis_libelle(&cle) {
            if moteur.accepte(touche) {
                self.accumule.clear();
                return moteur.presser(touche, sortie);
            }
        }

        if !est_prefixe(&cle) {
            self.accumule.pop();
        } else if moteur.mode().attend_chiffre() {
            self.accumule.clear();
        }
        false
    }
}
