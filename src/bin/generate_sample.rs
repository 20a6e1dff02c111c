use anyhow::{Context, Result};
use serde::Serialize;

/// Default reference point the sample is scattered around.
const CENTER: (f64, f64) = (37.675760, 126.754785);

/// Degrees of latitude per kilometre.
const DEG_PER_KM: f64 = 1.0 / 111.195;

/// One sheet row, with the headers the spreadsheet owner uses.
#[derive(Serialize)]
struct SampleRow {
    #[serde(rename = "이름")]
    name: String,
    #[serde(rename = "주소")]
    address: String,
    #[serde(rename = "위도")]
    latitude: String,
    #[serde(rename = "경도")]
    longitude: String,
    #[serde(rename = "연락처")]
    phone: String,
    #[serde(rename = "음식종류")]
    cuisine_type: String,
    #[serde(rename = "주차난이도")]
    parking_difficulty: String,
    #[serde(rename = "휴무")]
    closed_days: String,
    #[serde(rename = "오픈시간")]
    open_hours: String,
    #[serde(rename = "비고")]
    notes: String,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Uniform point within `radius_km` of `center`.
    fn point_near(&mut self, center: (f64, f64), radius_km: f64) -> (f64, f64) {
        let r = radius_km * self.next_f64().sqrt();
        let theta = 2.0 * std::f64::consts::PI * self.next_f64();
        let dlat = r * theta.sin() * DEG_PER_KM;
        let dlon = r * theta.cos() * DEG_PER_KM / center.0.to_radians().cos();
        (center.0 + dlat, center.1 + dlon)
    }
}

fn main() -> Result<()> {
    let output_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "sample_restaurants.csv".to_string());
    let mut rng = SimpleRng::new(42);

    let prefixes = ["주엽", "호수", "강선", "문촌", "후곡", "일산"];
    let kinds = [
        ("한식", "식당"),
        ("중식", "반점"),
        ("일식", "스시"),
        ("양식", "키친"),
        ("고기", "정육식당"),
        ("분식", "분식"),
    ];
    let parking = ["하", "중", "상", "하, 건물 주차장", ""];
    let closed = ["일요일", "월요일", "연중무휴", ""];
    let hours = ["11:00-21:00", "11:30-22:00", "17:00-24:00", ""];
    let notes = ["단체석 있음", "룸 예약 가능", "", ""];

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {output_path}"))?;

    let mut written = 0;
    for i in 0..24 {
        let prefix = rng.pick(&prefixes);
        let (cuisine, suffix) = kinds[i % kinds.len()];
        let (lat, lon) = rng.point_near(CENTER, 3.0);

        // A couple of rows the loader should drop.
        let (latitude, longitude) = match i {
            7 => ("확인 필요".to_string(), format!("{lon:.6}")),
            15 => (format!("{lat:.6}"), String::new()),
            _ => (format!("{lat:.6}"), format!("{lon:.6}")),
        };

        writer.serialize(SampleRow {
            name: format!("{prefix}{suffix} {}호점", i + 1),
            address: format!("경기도 고양시 일산서구 {prefix}로 {}", 10 + i * 7),
            latitude,
            longitude,
            phone: if i % 5 == 0 {
                String::new()
            } else {
                format!("031-{:03}-{:04}", 900 + i, rng.next_u64() % 10_000)
            },
            cuisine_type: cuisine.to_string(),
            parking_difficulty: rng.pick(&parking).to_string(),
            closed_days: rng.pick(&closed).to_string(),
            open_hours: rng.pick(&hours).to_string(),
            notes: rng.pick(&notes).to_string(),
        })?;
        written += 1;
    }
    writer.flush()?;

    println!("Wrote {written} restaurants (2 without valid coordinates) to {output_path}");
    Ok(())
}
