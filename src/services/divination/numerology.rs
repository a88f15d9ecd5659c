use chrono::Datelike;

use crate::services::dialogue::BirthDate;

const MASTER_NUMBERS: [u32; 3] = [11, 22, 33];

fn sum_digits(mut n: u32) -> u32 {
    let mut sum = 0;
    while n > 0 {
        sum += n % 10;
        n /= 10;
    }
    sum
}

/// Reduces to a single digit, stopping at the master numbers 11/22/33.
pub fn reduce_to_single_digit(mut n: u32) -> u32 {
    while n > 9 && !MASTER_NUMBERS.contains(&n) {
        n = sum_digits(n);
    }
    n
}

/// Life path number: day, month and year digit-sums combined, then reduced.
pub fn life_path_number(birth_date: BirthDate) -> u32 {
    let date = birth_date.0;
    let sum = sum_digits(date.day()) + sum_digits(date.month()) + sum_digits(date.year() as u32);
    reduce_to_single_digit(sum)
}

/// Chaldean-style letter values covering Latin and Cyrillic alphabets.
fn letter_value(c: char) -> Option<u32> {
    let value = match c {
        'a' | 'j' | 's' | 'а' | 'и' | 'с' | 'ъ' => 1,
        'b' | 'k' | 't' | 'б' | 'й' | 'т' | 'ы' => 2,
        'c' | 'l' | 'u' | 'в' | 'к' | 'у' | 'ь' => 3,
        'd' | 'm' | 'v' | 'г' | 'л' | 'ф' | 'э' => 4,
        'e' | 'n' | 'w' | 'д' | 'м' | 'х' | 'ю' => 5,
        'f' | 'o' | 'x' | 'е' | 'н' | 'ц' | 'я' => 6,
        'g' | 'p' | 'y' | 'ё' | 'о' | 'ч' | 'є' => 7,
        'h' | 'q' | 'z' | 'ж' | 'п' | 'ш' | 'і' => 8,
        'i' | 'r' | 'з' | 'р' | 'щ' | 'ї' => 9,
        _ => return None,
    };
    Some(value)
}

/// Destiny (expression) number from a full birth name. Characters outside
/// the letter table are ignored.
pub fn destiny_number(name: &str) -> u32 {
    let sum: u32 = name
        .chars()
        .flat_map(char::to_lowercase)
        .filter_map(letter_value)
        .sum();
    reduce_to_single_digit(sum)
}

/// Personal year number for the given calendar year.
pub fn personal_year_number(birth_date: BirthDate, year: i32) -> u32 {
    let date = birth_date.0;
    let sum = sum_digits(date.day()) + sum_digits(date.month()) + sum_digits(year as u32);
    reduce_to_single_digit(sum)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn birth_date(day: u32, month: u32, year: i32) -> BirthDate {
        BirthDate(NaiveDate::from_ymd_opt(year, month, day).unwrap())
    }

    #[test]
    fn test_reduce_lands_in_valid_range() {
        for n in 1..=1000 {
            let reduced = reduce_to_single_digit(n);
            assert!(
                (1..=9).contains(&reduced) || MASTER_NUMBERS.contains(&reduced),
                "{} reduced to {}",
                n,
                reduced
            );
        }
    }

    #[test]
    fn test_reduce_stops_at_master_numbers() {
        // 29 -> 2 + 9 = 11, a master number, never reduced to 2.
        assert_eq!(reduce_to_single_digit(29), 11);
        assert_eq!(reduce_to_single_digit(11), 11);
        assert_eq!(reduce_to_single_digit(22), 22);
        assert_eq!(reduce_to_single_digit(33), 33);
    }

    #[test]
    fn test_reduce_plain_numbers() {
        assert_eq!(reduce_to_single_digit(5), 5);
        assert_eq!(reduce_to_single_digit(10), 1);
        assert_eq!(reduce_to_single_digit(999), 9);
    }

    #[test]
    fn test_life_path_number() {
        // 15.06.1990: (1+5) + 6 + (1+9+9+0) = 31 -> 4
        assert_eq!(life_path_number(birth_date(15, 6, 1990)), 4);
    }

    #[test]
    fn test_destiny_number_ignores_non_letters() {
        // a=1, n=5, n=5, a=1 -> 12 -> 3
        assert_eq!(destiny_number("Anna"), 3);
        assert_eq!(destiny_number("An-na 12"), 3);
    }

    #[test]
    fn test_destiny_number_cyrillic() {
        // а=1, н=6, н=6, а=1 -> 14 -> 5
        assert_eq!(destiny_number("Анна"), 5);
    }

    #[test]
    fn test_personal_year_number() {
        // 15.06.____ in 2025: 6 + 6 + 9 = 21 -> 3
        assert_eq!(personal_year_number(birth_date(15, 6, 1990), 2025), 3);
    }
}
