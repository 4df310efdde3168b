//! Noyau : moteur de touches (machine à états)
//!
//! touche -> (mode, tampon de X, mémoire) -> pile / mémoire / mode -> rendu de X
//!
//! Le moteur est le seul à muter l’état. Le stockage est injecté (port `Stockage`) ;
//! l’affichage est une sortie pure (port `Affichage`).

use std::f64::consts::PI;

use tracing::{debug, trace, warn};

use super::format::{formater_precision_complete, Exposant};
use super::memoire::Memoire;
use super::mode::Mode;
use super::persistance::{self, Stockage};
use super::pile::Pile;
use super::reglages::{Format, Reglages, DECIMALES_MAX};
use super::touches::{Controle, Touche};

/// Invite des modes "sto" / "rcl".
pub const INVITE_REGISTRE: &str = "Reg 0-9:";

/// Invite du mode "plcs".
pub const INVITE_DECIMALES: &str = "Places 0-9:";

/// Sortie d’affichage, appelée après chaque touche acceptée.
pub trait Affichage {
    fn afficher_x(&mut self, texte: &str);
    fn afficher_registres(&mut self, texte: &str);
    fn afficher_statut(&mut self, texte: &str);
}

pub struct Moteur<S: Stockage> {
    pile: Pile,
    mode: Mode,
    memoire: Memoire,
    reglages: Reglages,
    /// Aperçu pleine précision : dure jusqu’à la touche suivante.
    apercu_actif: bool,
    stockage: S,
}

impl<S: Stockage> Moteur<S> {
    /// Charge réglages, mémoire et (si demandé) pile ; jamais d’échec.
    pub fn new(stockage: S) -> Self {
        let (reglages, memoire) = persistance::charger_reglages(&stockage);
        let format = reglages.format();
        let sauvee = if reglages.conserver_pile {
            persistance::charger_pile(&stockage)
        } else {
            None
        };
        let pile = match sauvee {
            Some(valeurs) => Pile::depuis_valeurs(valeurs, format),
            None => Pile::new(format),
        };

        Self {
            pile,
            mode: Mode::default(),
            memoire,
            reglages,
            apercu_actif: false,
            stockage,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pile(&self) -> &Pile {
        &self.pile
    }

    pub fn memoire(&self) -> &Memoire {
        &self.memoire
    }

    pub fn reglages(&self) -> &Reglages {
        &self.reglages
    }

    pub fn stockage(&self) -> &S {
        &self.stockage
    }

    fn format(&self) -> Format {
        self.reglages.format()
    }

    /* ------------------------ Requêtes ------------------------ */

    /// Les modes invite n’acceptent que 0-9.
    pub fn accepte(&self, touche: Touche) -> bool {
        !self.mode.attend_chiffre() || touche.chiffre().is_some()
    }

    /// X en pleine précision si l’aperçu est actif (ne modifie rien).
    pub fn apercu(&self) -> Option<String> {
        self.apercu_actif
            .then(|| formater_precision_complete(self.pile.x()))
    }

    /// Texte de X tel qu’il doit être affiché maintenant.
    pub fn texte_x(&self) -> String {
        self.apercu()
            .unwrap_or_else(|| self.pile.tampon().to_string())
    }

    pub fn texte_registres(&self) -> String {
        if self.reglages.afficher_registres {
            self.pile.texte_registres(self.format())
        } else {
            String::new()
        }
    }

    pub fn statut(&self) -> String {
        self.reglages.statut()
    }

    pub fn rendre(&self, sortie: &mut dyn Affichage) {
        sortie.afficher_x(&self.texte_x());
        sortie.afficher_registres(&self.texte_registres());
        sortie.afficher_statut(&self.statut());
    }

    /* ------------------------ Entrée ------------------------ */

    /// Exécute puis rend. Retourne false si la touche est refusée (rien ne bouge).
    pub fn presser(&mut self, touche: Touche, sortie: &mut dyn Affichage) -> bool {
        let ok = self.executer(touche);
        if ok {
            self.rendre(sortie);
        }
        ok
    }

    /// Exécute une touche sans rendu.
    pub fn executer(&mut self, touche: Touche) -> bool {
        if !self.accepte(touche) {
            trace!(touche = touche.libelle(), mode = self.mode.as_str(), "touche refusée");
            return false;
        }

        let mode_avant = self.mode;
        let valeurs_avant = self.pile.valeurs();

        if touche != Touche::Controle(Controle::PrecisionComplete) {
            self.apercu_actif = false;
        }

        match touche {
            Touche::Chiffre(_) | Touche::Point => {
                if let Some(car) = touche.litteral() {
                    self.litteral(car);
                }
            }
            Touche::Binaire(op) => {
                let r = op.appliquer(self.pile.y(), self.pile.x());
                let format = self.format();
                self.pile.remplacer_xy(r, format);
                self.mode = Mode::Conserve;
            }
            Touche::Unaire(op) => {
                let r = op.appliquer(self.pile.x(), self.reglages.unite_angle);
                let format = self.format();
                self.pile.remplacer_x(r, format);
                self.mode = Mode::Conserve;
            }
            Touche::Controle(c) => self.controle(c),
        }

        debug!(
            touche = touche.libelle(),
            avant = mode_avant.as_str(),
            apres = self.mode.as_str(),
            x = self.pile.x(),
            "touche"
        );

        let change = self
            .pile
            .valeurs()
            .iter()
            .zip(valeurs_avant.iter())
            .any(|(a, b)| a.to_bits() != b.to_bits());
        if change && self.reglages.conserver_pile {
            self.sauver_pile();
        }

        true
    }

    /// Formulaire d’options : tout d’un coup, décimales bornées à [0, 9].
    pub fn appliquer_options(&mut self, options: Reglages) {
        self.reglages = Reglages {
            decimales: options.decimales.min(DECIMALES_MAX),
            ..options
        };
        self.apercu_actif = false;
        let format = self.format();
        self.pile.rafraichir(format);
        self.mode = Mode::Conserve;
        self.sauver_reglages();
        if self.reglages.conserver_pile {
            self.sauver_pile();
        }
    }

    /// Valeurs actuelles pour pré-remplir le formulaire.
    pub fn options(&self) -> Reglages {
        self.reglages
    }

    /* ------------------------ Littéraux ------------------------ */

    fn litteral(&mut self, car: char) {
        let format = self.format();

        match self.mode {
            Mode::Saisie => {
                let mut texte = self.pile.tampon().to_string();
                texte.push(car);
                if !self.pile.saisir(texte) {
                    trace!(%car, tampon = self.pile.tampon(), "caractère refusé");
                }
            }

            Mode::Conserve | Mode::Remplace => {
                if self.mode == Mode::Conserve {
                    self.pile.entrer(format);
                }
                // "." seul ne se relit pas : on commence par "0."
                let texte = if car == '.' {
                    "0.".to_string()
                } else {
                    car.to_string()
                };
                if self.pile.saisir(texte) {
                    self.mode = Mode::Saisie;
                }
            }

            Mode::Exposant => {
                if car == '.' {
                    return;
                }
                if let Some(mut e) = Exposant::depuis_tampon(self.pile.tampon()) {
                    e.ajouter_chiffre(car);
                    self.pile.saisir(e.to_string());
                }
            }

            Mode::MemoireStocker => {
                let Some(case) = chiffre(car) else { return };
                self.memoire.stocker(case, self.pile.x());
                self.pile.rafraichir(format);
                self.mode = Mode::Conserve;
                self.sauver_reglages();
            }

            Mode::MemoireRappeler => {
                let Some(case) = chiffre(car) else { return };
                self.pile.nouveau_x(self.memoire.rappeler(case), format);
                self.mode = Mode::Conserve;
            }

            Mode::Decimales => {
                let Some(d) = chiffre(car) else { return };
                self.reglages.decimales = u8::try_from(d).unwrap_or(DECIMALES_MAX);
                let format = self.format();
                self.pile.rafraichir(format);
                self.mode = Mode::Conserve;
                self.sauver_reglages();
            }
        }
    }

    /* ------------------------ Contrôles ------------------------ */

    fn controle(&mut self, c: Controle) {
        let format = self.format();

        match c {
            Controle::Entree => {
                self.pile.entrer(format);
                self.mode = Mode::Remplace;
            }

            Controle::Stocker => {
                self.pile.definir_tampon(INVITE_REGISTRE);
                self.mode = Mode::MemoireStocker;
            }
            Controle::Rappeler => {
                self.pile.definir_tampon(INVITE_REGISTRE);
                self.mode = Mode::MemoireRappeler;
            }
            Controle::Decimales => {
                self.pile.definir_tampon(INVITE_DECIMALES);
                self.mode = Mode::Decimales;
            }

            Controle::RoulerBas => {
                self.pile.rouler_bas(format);
                self.mode = Mode::Conserve;
            }
            Controle::RoulerHaut => {
                self.pile.rouler_haut(format);
                self.mode = Mode::Conserve;
            }
            Controle::Echanger => {
                self.pile.echanger_xy(format);
                self.mode = Mode::Conserve;
            }

            Controle::PrecisionComplete => {
                self.apercu_actif = !self.apercu_actif;
            }

            // Réglages sans effet sur le mode de saisie
            Controle::Registres => {
                self.reglages.afficher_registres = !self.reglages.afficher_registres;
                self.sauver_reglages();
            }
            Controle::UniteAngle => {
                self.reglages.unite_angle = self.reglages.unite_angle.suivante();
                self.sauver_reglages();
            }

            Controle::Scientifique => {
                self.reglages.scientifique = !self.reglages.scientifique;
                let format = self.format();
                self.pile.rafraichir(format);
                self.mode = Mode::Conserve;
                self.sauver_reglages();
            }

            Controle::Effacer => {
                self.pile.effacer(format);
                self.mode = Mode::Conserve;
            }
            Controle::Pi => {
                self.pile.nouveau_x(PI, format);
                self.mode = Mode::Conserve;
            }

            Controle::Exposant => self.debut_exposant(),
            Controle::ChangerSigne => self.changer_signe(),
            Controle::RetourArriere => self.retour_arriere(),
        }
    }

    fn debut_exposant(&mut self) {
        let format = self.format();
        match self.mode {
            Mode::Exposant => return,
            Mode::Conserve => self.pile.entrer(format),
            _ => {}
        }
        let mantisse = if self.mode == Mode::Saisie {
            self.pile.tampon().to_string()
        } else {
            "1".to_string()
        };
        if self.pile.saisir(Exposant::nouveau(&mantisse).to_string()) {
            self.mode = Mode::Exposant;
        }
    }

    fn changer_signe(&mut self) {
        let tampon = self.pile.tampon();

        let texte = if self.mode == Mode::Exposant {
            match Exposant::depuis_tampon(tampon) {
                Some(mut e) => {
                    e.changer_signe();
                    e.to_string()
                }
                None => return,
            }
        } else if self.pile.x().is_nan() {
            // NaN n’a pas de signe affichable
            return;
        } else {
            match tampon.strip_prefix('-') {
                Some(reste) => reste.to_string(),
                None => format!("-{tampon}"),
            }
        };

        self.pile.saisir(texte);
    }

    fn retour_arriere(&mut self) {
        match self.mode {
            Mode::Saisie => {
                let tampon = self.pile.tampon();
                let mut car = tampon.chars();
                car.next_back();
                let avant_dernier = car.clone().next_back();
                if tampon.chars().count() > 1 && avant_dernier != Some('-') {
                    let raccourci = car.as_str().to_string();
                    if self.pile.saisir(raccourci) {
                        return;
                    }
                }
                self.remise_a_zero();
            }

            Mode::Exposant => {
                let Some(mut e) = Exposant::depuis_tampon(self.pile.tampon()) else {
                    self.remise_a_zero();
                    return;
                };
                if e.chiffres.len() > 1 {
                    e.chiffres.pop();
                } else if e.chiffres != "0" {
                    e.chiffres = "0".to_string();
                } else {
                    // exposant déjà nul : on retire le suffixe entier
                    if self.pile.saisir(e.mantisse) {
                        self.mode = Mode::Saisie;
                    }
                    return;
                }
                self.pile.saisir(e.to_string());
            }

            _ => self.remise_a_zero(),
        }
    }

    /// X := 0, mode Remplace.
    fn remise_a_zero(&mut self) {
        let format = self.format();
        self.pile.remplacer_x(0.0, format);
        self.mode = Mode::Remplace;
    }

    /* ------------------------ Persistance ------------------------ */

    fn sauver_reglages(&mut self) {
        if let Err(e) =
            persistance::sauver_reglages(&mut self.stockage, &self.reglages, &self.memoire)
        {
            warn!("sauvegarde des réglages impossible: {e}");
        }
    }

    fn sauver_pile(&mut self) {
        if let Err(e) = persistance::sauver_pile(&mut self.stockage, &self.pile.valeurs()) {
            warn!("sauvegarde de la pile impossible: {e}");
        }
    }
}

fn chiffre(car: char) -> Option<usize> {
    car.to_digit(10).and_then(|d| usize::try_from(d).ok())
}
