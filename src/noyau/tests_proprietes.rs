//! Tests propriétés (fuzz safe) : séquences de touches aléatoires mais déterministes.
//!
//! But : marteler le moteur sans brûler la machine.
//! - RNG déterministe (seed fixe)
//! - longueur bornée
//! - budget temps global
//! - invariants : 4 registres, moteur toujours utilisable, tampon relisible hors invites

use std::time::{Duration, Instant};

use super::format::{analyser, formater};
use super::moteur::{Affichage, Moteur};
use super::persistance::StockageMemoire;
use super::touches::Touche;

/* ------------------------ RNG déterministe minimal ------------------------ */

#[derive(Clone)]
struct Rng {
    state: u64,
}
impl Rng {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }
    fn next_u32(&mut self) -> u32 {
        // LCG simple (déterministe)
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.state >> 32) as u32
    }
    fn pick(&mut self, n: usize) -> usize {
        if n == 0 {
            0
        } else {
            self.next_u32() as usize % n
        }
    }
}

/* ------------------------ Budget anti-gel ------------------------ */

fn budget(start: Instant, max: Duration) {
    if start.elapsed() > max {
        panic!("budget temps dépassé: {:?}", max);
    }
}

/* ------------------------ Helpers ------------------------ */

struct Muet;

impl Affichage for Muet {
    fn afficher_x(&mut self, _: &str) {}
    fn afficher_registres(&mut self, _: &str) {}
    fn afficher_statut(&mut self, _: &str) {}
}

/// Chiffres pondérés (plus fréquents) + toutes les autres touches.
const LIBELLES: &[&str] = &[
    "0", "1", "2", "3", "4", "5", "6", "7", "8", "9", "1", "2", "5", "7", ".", "+", "-", "*", "/",
    "y^x", "xrt", "x^2", "sqrt", "rcip", "sin", "cos", "tan", "asin", "acos", "atan", "ln", "e^x",
    "log", "tn^x", "ent", "ent", "sto", "rcl", "r<", "r>", "x<>y", "show", "reg", "plcs", "sci",
    "deg", "clr", "pi", "exp", "exp", "chs", "chs", "<-", "<-",
];

fn touche_au_hasard(rng: &mut Rng) -> Touche {
    let l = LIBELLES[rng.pick(LIBELLES.len())];
    l.parse()
        .unwrap_or_else(|e| panic!("libelle={l:?}: {e}"))
}

/* ------------------------ Campagne ------------------------ */

#[test]
fn fuzz_sequences_invariants() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);

    for seed in 1..=40u64 {
        let mut rng = Rng::new(seed);
        let mut m = Moteur::new(StockageMemoire::default());

        for pas in 0..400 {
            budget(t0, max);

            let t = touche_au_hasard(&mut rng);
            let accepte = m.accepte(t);
            assert_eq!(m.presser(t, &mut Muet), accepte, "seed={seed} pas={pas}");

            // 4 registres, toujours
            assert_eq!(m.pile().valeurs().len(), 4);

            // hors invites, le tampon se relit (sauf aperçu qui ne touche pas le tampon)
            if !m.mode().attend_chiffre() {
                let tampon = m.pile().tampon();
                assert!(
                    analyser(tampon).is_ok(),
                    "seed={seed} pas={pas} tampon={tampon:?}"
                );
            }
        }

        // toujours utilisable : on sort d’un éventuel mode invite puis on calcule
        m.presser(Touche::Chiffre(0), &mut Muet);
        for l in ["clr", "2", "ent", "3", "+"] {
            assert!(m.presser(l.parse().unwrap(), &mut Muet), "seed={seed} l={l}");
        }
        assert_eq!(m.pile().x(), 5.0, "seed={seed}");
    }
}

#[test]
fn fuzz_aller_retour_format() {
    let t0 = Instant::now();
    let max = Duration::from_secs(5);
    let mut rng = Rng::new(7);

    for _ in 0..5_000 {
        budget(t0, max);

        // mantisse [1, 10) * 10^e, e dans [-12, 12], signe aléatoire
        let mantisse = 1.0 + (rng.next_u32() as f64 / u32::MAX as f64) * 9.0;
        let e = rng.pick(25) as i32 - 12;
        let signe = if rng.pick(2) == 0 { -1.0 } else { 1.0 };
        let v = signe * mantisse * 10f64.powi(e);

        let texte = formater(v, 9, rng.pick(2) == 0);
        let relu = analyser(&texte).unwrap_or_else(|err| panic!("{texte:?}: {err}"));

        // 9 décimales : précision relative attendue ~1e-9 (scientifique), absolue 5e-10 (fixe)
        let tol = (v.abs() * 1e-8).max(1e-9);
        assert!((relu - v).abs() <= tol, "v={v} texte={texte:?} relu={relu}");
    }
}
