// src/noyau/touches.rs
//
// Touches de la calculatrice.
//
// Quatre familles :
// - littéral (0-9, ".")        : alimente le tampon de X
// - opérateur binaire (Y, X)   : consomme X et Y
// - opérateur unaire (X)       : remplace X seul
// - contrôle                   : pile / mode / réglages
//
// Chaque opérateur est une fonction pure choisie par son étiquette (pas d’évaluation de texte).

use std::str::FromStr;

use thiserror::Error;

use super::reglages::UniteAngle;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpBinaire {
    Plus,
    Moins,
    Fois,
    Divise,
    /// y^x
    Puissance,
    /// racine x-ième de y
    Racine,
}

impl OpBinaire {
    /// Arguments dans l’ordre (Y, X).
    pub fn appliquer(self, y: f64, x: f64) -> f64 {
        match self {
            OpBinaire::Plus => y + x,
            OpBinaire::Moins => y - x,
            OpBinaire::Fois => y * x,
            OpBinaire::Divise => y / x,
            OpBinaire::Puissance => y.powf(x),
            OpBinaire::Racine => y.powf(1.0 / x),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OpUnaire {
    Carre,
    RacineCarree,
    Inverse,
    Sin,
    Cos,
    Tan,
    Asin,
    Acos,
    Atan,
    Ln,
    Exp,
    Log,
    PuissanceDix,
}

impl OpUnaire {
    /// Trig : X est exprimé dans `unite` ; trig inverse : résultat dans `unite`.
    pub fn appliquer(self, x: f64, unite: UniteAngle) -> f64 {
        let k = unite.facteur();
        match self {
            OpUnaire::Carre => x * x,
            OpUnaire::RacineCarree => x.sqrt(),
            OpUnaire::Inverse => 1.0 / x,
            OpUnaire::Sin => (x * k).sin(),
            OpUnaire::Cos => (x * k).cos(),
            OpUnaire::Tan => (x * k).tan(),
            OpUnaire::Asin => x.asin() / k,
            OpUnaire::Acos => x.acos() / k,
            OpUnaire::Atan => x.atan() / k,
            OpUnaire::Ln => x.ln(),
            OpUnaire::Exp => x.exp(),
            OpUnaire::Log => x.log10(),
            OpUnaire::PuissanceDix => 10f64.powf(x),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Controle {
    Entree,
    Stocker,
    Rappeler,
    RoulerBas,
    RoulerHaut,
    Echanger,
    PrecisionComplete,
    Registres,
    Decimales,
    Scientifique,
    UniteAngle,
    Effacer,
    Pi,
    Exposant,
    ChangerSigne,
    RetourArriere,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Touche {
    /// 0-9
    Chiffre(u8),
    Point,
    Binaire(OpBinaire),
    Unaire(OpUnaire),
    Controle(Controle),
}

#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("touche inconnue: {0:?}")]
pub struct ToucheInconnue(pub String);

/// Table étiquette -> touche (hors chiffres, traités à part).
const TABLE: &[(&str, Touche)] = &[
    (".", Touche::Point),
    ("+", Touche::Binaire(OpBinaire::Plus)),
    ("-", Touche::Binaire(OpBinaire::Moins)),
    ("*", Touche::Binaire(OpBinaire::Fois)),
    ("/", Touche::Binaire(OpBinaire::Divise)),
    ("y^x", Touche::Binaire(OpBinaire::Puissance)),
    ("xrt", Touche::Binaire(OpBinaire::Racine)),
    ("x^2", Touche::Unaire(OpUnaire::Carre)),
    ("sqrt", Touche::Unaire(OpUnaire::RacineCarree)),
    ("rcip", Touche::Unaire(OpUnaire::Inverse)),
    ("sin", Touche::Unaire(OpUnaire::Sin)),
    ("cos", Touche::Unaire(OpUnaire::Cos)),
    ("tan", Touche::Unaire(OpUnaire::Tan)),
    ("asin", Touche::Unaire(OpUnaire::Asin)),
    ("acos", Touche::Unaire(OpUnaire::Acos)),
    ("atan", Touche::Unaire(OpUnaire::Atan)),
    ("ln", Touche::Unaire(OpUnaire::Ln)),
    ("e^x", Touche::Unaire(OpUnaire::Exp)),
    ("log", Touche::Unaire(OpUnaire::Log)),
    ("tn^x", Touche::Unaire(OpUnaire::PuissanceDix)),
    ("ent", Touche::Controle(Controle::Entree)),
    ("\r", Touche::Controle(Controle::Entree)),
    ("sto", Touche::Controle(Controle::Stocker)),
    ("rcl", Touche::Controle(Controle::Rappeler)),
    ("r<", Touche::Controle(Controle::RoulerBas)),
    ("r>", Touche::Controle(Controle::RoulerHaut)),
    ("x<>y", Touche::Controle(Controle::Echanger)),
    ("show", Touche::Controle(Controle::PrecisionComplete)),
    ("reg", Touche::Controle(Controle::Registres)),
    ("plcs", Touche::Controle(Controle::Decimales)),
    ("sci", Touche::Controle(Controle::Scientifique)),
    ("deg", Touche::Controle(Controle::UniteAngle)),
    ("clr", Touche::Controle(Controle::Effacer)),
    ("pi", Touche::Controle(Controle::Pi)),
    ("exp", Touche::Controle(Controle::Exposant)),
    ("chs", Touche::Controle(Controle::ChangerSigne)),
    ("<-", Touche::Controle(Controle::RetourArriere)),
];

impl Touche {
    /// Recherche exacte (étiquettes en minuscules).
    pub fn depuis_libelle(libelle: &str) -> Option<Touche> {
        let mut car = libelle.chars();
        if let (Some(c), None) = (car.next(), car.next()) {
            if let Some(d) = c.to_digit(10) {
                return u8::try_from(d).ok().map(Touche::Chiffre);
            }
        }
        TABLE
            .iter()
            .find(|(l, _)| *l == libelle)
            .map(|(_, t)| *t)
    }

    /// Chiffre 0-9 porté par la touche, sinon None (le point n’en est pas un).
    pub fn chiffre(self) -> Option<u8> {
        match self {
            Touche::Chiffre(d) => Some(d),
            _ => None,
        }
    }

    /// Caractère littéral à ajouter au tampon.
    pub fn litteral(self) -> Option<char> {
        match self {
            Touche::Chiffre(d) => char::from_digit(u32::from(d), 10),
            Touche::Point => Some('.'),
            _ => None,
        }
    }

    pub fn libelle(self) -> &'static str {
        const CHIFFRES: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];
        if let Touche::Chiffre(d) = self {
            return CHIFFRES.get(usize::from(d)).copied().unwrap_or("?");
        }
        TABLE
            .iter()
            .find(|(_, t)| *t == self)
            .map(|(l, _)| *l)
            .unwrap_or("?")
    }
}

impl FromStr for Touche {
    type Err = ToucheInconnue;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Touche::depuis_libelle(&s.to_lowercase()).ok_or_else(|| ToucheInconnue(s.to_string()))
    }
}

/// Vrai si `debut` est un préfixe strict d’au moins une étiquette.
pub fn est_prefixe(debut: &str) -> bool {
    !debut.is_empty()
        && TABLE
            .iter()
            .any(|(l, _)| l.len() > debut.len() && l.starts_with(debut))
}
