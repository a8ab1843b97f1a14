//! Canned guide text used when the language model is unavailable.

pub const MISSING_KEY_REPLY: &str = "Error: Gemini API Key not configured.";

pub const BUSY_REPLY: &str = "My connection is very busy right now. \
                              But I can tell you that you are in the heart of history!";

pub const OFFLINE_REPLY: &str =
    "I'm having a little trouble connecting to my knowledge base right now.";

/// Welcome speeches for the main Ichan Kala landmarks, keyed by place name.
const LANDMARK_WELCOMES: &[(&str, &str)] = &[
    (
        "Kalta Minor Minaret",
        "Welcome to the Kalta Minor Minaret. This iconic turquoise tower was intended to be the \
         tallest minaret in the Islamic world but was never finished. Its vibrant blue tiles make \
         it a symbol of Khiva.",
    ),
    (
        "West Gate of Itchan Kala",
        "Welcome to the West Gate, also known as Ata Darvaza. This is the main entrance to the \
         ancient fortress of Ichan Kala. Step through these gates to travel back in time.",
    ),
    (
        "Kunta Ark Citadel",
        "Welcome to Kunta Ark, the fortress within a fortress. This citadel served as the \
         residence for the Khans of Khiva and houses the throne room, harem, and old prison.",
    ),
    (
        "Juma Mosque",
        "Welcome to the Juma Mosque. This unique mosque is famous for its 213 carved wooden \
         columns, some dating back to the 10th century. Notice how the light plays through the \
         opening in the roof.",
    ),
    (
        "Tash Hauli Palace",
        "Welcome to Tash Hauli Palace, known as the Stone Palace. Explore its three main \
         courtyards and marvel at the intricate blue tile work that adorns every surface.",
    ),
    (
        "Pahlavan Mahmud Mausoleum",
        "Welcome to the Pahlavan Mahmud Mausoleum. This sacred site honors the patron saint of \
         Khiva, a legendary poet and wrestler. It is considered one of the most beautiful spots \
         in the city.",
    ),
    (
        "Islam Khoja Minaret",
        "Welcome to the Islam Khoja Minaret. It is the tallest minaret in Khiva, standing at 57 \
         meters. You can see its glowing bands of glazed tiles from miles away.",
    ),
    (
        "Muhammad Amin Khan Madrasah",
        "Welcome to the Muhammad Amin Khan Madrasah. Historically the largest madrasah in \
         Central Asia, it is now the Orient Star Hotel. It stands right next to the Kalta Minor.",
    ),
];

pub fn landmark_welcome(place_name: &str) -> String {
    LANDMARK_WELCOMES
        .iter()
        .find(|(name, _)| *name == place_name)
        .map(|(_, text)| text.to_string())
        .unwrap_or_else(|| {
            format!(
                "Welcome to {}. This is one of the most fascinating historical sites \
                 in Ichan Kala.",
                place_name
            )
        })
}

/// Strip markdown and quote markup the model sometimes emits despite the prompt.
pub fn clean_speech(text: &str) -> String {
    text.replace("```", "")
        .replace('*', "")
        .replace("</blockquote>", "")
        .replace('>', "")
        .trim()
        .to_string()
}
