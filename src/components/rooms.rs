use lazy_static::lazy_static;
use std::collections::BTreeMap;

lazy_static! {
    /// Room name to Google Calendar resource id
    static ref ROOM_CALENDARS: BTreeMap<&'static str, &'static str> = {
        let mut rooms = BTreeMap::new();
        rooms.insert("chico_mendes", "thoughtworks.com_37313433313636302d333830@resource.calendar.google.com");
        rooms.insert("sim_mas_nao", "thoughtworks.com_37313732313338312d373537@resource.calendar.google.com");
        rooms.insert("lelia_gonzales", "thoughtworks.com_3330333432383935363531@resource.calendar.google.com");
        rooms.insert("brasil", "thoughtworks.com_31323137373134312d353732@resource.calendar.google.com");
        rooms.insert("tw_offices", "thoughtworks.com_3135383336323935373238@resource.calendar.google.com");
        rooms.insert("pagu", "thoughtworks.com_2d36353639323535352d353233@resource.calendar.google.com");
        rooms.insert("street_art", "thoughtworks.com_3139313432393239373034@resource.calendar.google.com");
        rooms.insert("paulo_freire", "thoughtworks.com_2d3430363632373832353536@resource.calendar.google.com");
        rooms.insert("bolicho", "thoughtworks.com_2d3238333338333333363138@resource.calendar.google.com");
        rooms.insert("ctg", "thoughtworks.com_2d343134393436322d3835@resource.calendar.google.com");
        rooms.insert("galpao", "thoughtworks.com_2d3136333930333638363531@resource.calendar.google.com");
        rooms.insert("castle", "thoughtworks.com_2d35393233393931322d353235@resource.calendar.google.com");
        rooms.insert("riacho_ipiranga", "thoughtworks.com_2d39333739393938362d3132@resource.calendar.google.com");
        rooms.insert("sao_paulo", "thoughtworks.com_2d39393634303632352d353330@resource.calendar.google.com");
        rooms.insert("cancha", "thoughtworks.com_38393738373834343135@resource.calendar.google.com");
        rooms.insert("vila_do_chaves", "thoughtworks.com_2d3532393931353437323839@resource.calendar.google.com");
        rooms.insert("troll", "thoughtworks.com_393734383030332d343636@resource.calendar.google.com");
        rooms.insert("pastoreio", "thoughtworks.com_3134383630323038393334@resource.calendar.google.com");
        rooms.insert("darcy_penteado", "thoughtworks.com_3232393631343539343634@resource.calendar.google.com");
        rooms.insert("beer", "thoughtworks.com_32393134353732302d383330@resource.calendar.google.com");
        rooms.insert("maria_lacerda", "thoughtworks.com_393436363035362d393434@resource.calendar.google.com");
        rooms
    };
}

/// Fixed mapping of room names to their calendar ids
#[derive(Debug, Clone, PartialEq)]
pub struct RoomRegistry {
    rooms: BTreeMap<String, String>,
}

impl RoomRegistry {
    /// The compiled-in room table
    pub fn builtin() -> Self {
        Self::from_entries(ROOM_CALENDARS.iter().map(|(name, id)| (*name, *id)))
    }

    /// Build a registry from arbitrary entries; names are stored lowercased
    pub fn from_entries<I, N, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        let rooms = entries
            .into_iter()
            .map(|(name, id)| (name.into().to_lowercase(), id.into()))
            .collect();
        Self { rooms }
    }

    /// Look up a room's calendar id, ignoring case
    pub fn calendar_id(&self, name: &str) -> Option<&str> {
        self.rooms.get(&name.to_lowercase()).map(String::as_str)
    }

    /// Room names in sorted order
    pub fn names(&self) -> Vec<&str> {
        self.rooms.keys().map(String::as_str).collect()
    }

    /// Iterate `(name, calendar_id)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rooms.iter().map(|(name, id)| (name.as_str(), id.as_str()))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }
}
