// src/noyau/mode.rs
//
// Modes de saisie. Un seul actif à la fois ; seul le moteur les fait évoluer.

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Saisie de X chiffre par chiffre.
    Saisie,
    /// Résultat précédent en place : une saisie le pousse en Y.
    #[default]
    Conserve,
    /// X vient d’être posé (enter, effacement) : une saisie le remplace.
    Remplace,
    /// Édition du suffixe " x10^<exp>".
    Exposant,
    /// Attend 0-9 : registre où stocker X.
    MemoireStocker,
    /// Attend 0-9 : registre à rappeler.
    MemoireRappeler,
    /// Attend 0-9 : nombre de décimales.
    Decimales,
}

impl Mode {
    /// Modes “invite” : seuls les chiffres 0-9 y sont acceptés.
    pub fn attend_chiffre(self) -> bool {
        matches!(
            self,
            Mode::MemoireStocker | Mode::MemoireRappeler | Mode::Decimales
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Saisie => "SAISIE",
            Mode::Conserve => "CONSERVE",
            Mode::Remplace => "REMPLACE",
            Mode::Exposant => "EXPOSANT",
            Mode::MemoireStocker => "STO",
            Mode::MemoireRappeler => "RCL",
            Mode::Decimales => "DECIMALES",
        }
    }
}
