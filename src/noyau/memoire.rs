// src/noyau/memoire.rs
//
// Dix registres mémoire (0-9). Écrits seulement par "sto", lus seulement par "rcl".

pub const NB_REGISTRES: usize = 10;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Memoire {
    registres: [f64; NB_REGISTRES],
}

impl Memoire {
    pub fn depuis(registres: [f64; NB_REGISTRES]) -> Self {
        Self { registres }
    }

    /// Panique si `case` >= 10 (le moteur ne transmet que des chiffres).
    pub fn stocker(&mut self, case: usize, valeur: f64) {
        self.registres[case] = valeur;
    }

    pub fn rappeler(&self, case: usize) -> f64 {
        self.registres[case]
    }

    pub fn registres(&self) -> &[f64; NB_REGISTRES] {
        &self.registres
    }
}
