/// Rating Mapper
/// ポラリティ [-1, 1] を星評価 [1, 5] に線形変換する
///
/// Formula:
///   rating = ((polarity + 1) / 2) * 4 + 1
///   result = clamp(round_to_tenth(rating), 1.0, 5.0)
///
/// Ties round half to even (3.25 -> 3.2, 3.75 -> 3.8). The tie is judged on
/// the f64 product `rating * 10`, not on the binary value of `rating`, so a
/// rating that is stored just below x.x5 can still count as a tie
/// (polarity -0.975 -> 1.0).
pub const MIN_RATING: f64 = 1.0;
pub const MAX_RATING: f64 = 5.0;

pub fn map_polarity(polarity: f64) -> f64 {
    let rating = ((polarity + 1.0) / 2.0) * (MAX_RATING - MIN_RATING) + MIN_RATING;
    round_to_tenth(rating).clamp(MIN_RATING, MAX_RATING)
}

pub fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}
