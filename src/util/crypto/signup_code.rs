use rand::{distributions::Uniform, prelude::Distribution, thread_rng};

pub const SIGNUP_CODE_LEN: usize = 6;
const SIGNUP_CODE_CHARSET: [u8; 10] = *b"0123456789";

pub fn generate_signup_code() -> String {
    let mut rng = thread_rng();
    let between = Uniform::from(0..SIGNUP_CODE_CHARSET.len());

    (0..SIGNUP_CODE_LEN)
        .map(|_| {
            let idx = between.sample(&mut rng);
            SIGNUP_CODE_CHARSET[idx] as char
        })
        .collect()
}
