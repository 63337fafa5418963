//! Moteurs statistiques sur l'historique des tirages EuroJackpot.
//!
//! Tous les moteurs sont des fonctions pures et synchrones sur une tranche
//! de tirages en ordre chronologique (`draws[0]` = le plus ancien). Aucun
//! état partagé entre les appels : chaque moteur reçoit son historique et
//! retourne un résultat fraîchement alloué. Un historique vide produit des
//! résultats neutres (tables à zéro, listes vides), jamais une erreur.

pub mod frequency;
pub mod pairs;
pub mod overdue;
pub mod distributions;
pub mod picks;
pub mod evaluate;
