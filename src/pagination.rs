use rand::Rng;

/// Pick the results page for the next search at a pin.
///
/// With no recorded page count, or a count of one or less, the first page is
/// used. Otherwise the page is drawn uniformly from `1..total_pages`; the
/// last page is never chosen.
pub fn choose_page<R: Rng + ?Sized>(total_pages: Option<i64>, rng: &mut R) -> i64 {
    match total_pages {
        Some(n) if n > 1 => rng.gen_range(1..n),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn unknown_or_small_totals_use_first_page() {
        let mut rng = StdRng::seed_from_u64(7);
        for total in [None, Some(-3), Some(0), Some(1)] {
            for _ in 0..50 {
                assert_eq!(choose_page(total, &mut rng), 1);
            }
        }
    }

    #[test]
    fn page_stays_below_total() {
        let mut rng = StdRng::seed_from_u64(42);
        for n in 2..40 {
            for _ in 0..200 {
                let page = choose_page(Some(n), &mut rng);
                assert!((1..=n - 1).contains(&page), "page {} out of range for total {}", page, n);
            }
        }
    }

    #[test]
    fn two_pages_always_picks_first() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..100 {
            assert_eq!(choose_page(Some(2), &mut rng), 1);
        }
    }

    #[test]
    fn every_page_below_total_is_reachable() {
        let mut rng = StdRng::seed_from_u64(99);
        let mut seen = [false; 5];
        for _ in 0..2_000 {
            let page = choose_page(Some(6), &mut rng);
            seen[(page - 1) as usize] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
