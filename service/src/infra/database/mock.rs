//! In-memory [`Database`] for tests.

use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use common::operations::{By, Commit, Insert, Select, Transact, Update};
use tracerr::Traced;

use crate::{
    domain::{
        exercise,
        user::{self, Profile},
        workout, Exercise, Set, User, Workout,
    },
    infra::{database, Database},
    read, session, Config, Service,
};

/// Secret the [`service()`] signs its tokens with.
pub(crate) const SECRET: &[u8] = b"correct horse battery staple";

/// Creates a new [`Service`] backed by an empty [`Mock`] database.
pub(crate) fn service() -> Service<Mock> {
    Service::new(
        Config {
            jwt_encoding_key: jsonwebtoken::EncodingKey::from_secret(SECRET),
            jwt_decoding_key: jsonwebtoken::DecodingKey::from_secret(SECRET),
            session: session::Config::default(),
        },
        Mock::default(),
    )
}

/// Creates a new [`User`] with the provided `email` and an unusable password.
pub(crate) fn user(email: &str) -> User {
    #[expect(unsafe_code, reason = "never verified")]
    let password_hash = unsafe { user::PasswordHash::new_unchecked("!") };
    User {
        id: user::Id::new(),
        email: user::Email::new(email).unwrap(),
        password_hash,
        created_at: user::CreationDateTime::now(),
    }
}

/// Issues a [`session::Token`] of the provided [`User`] valid for `ttl`.
///
/// [`session::Token`]: user::session::Token
pub(crate) fn token(user_id: user::Id, ttl: Duration) -> user::session::Token {
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &user::Session {
            user_id,
            expires_at: user::session::ExpirationDateTime::now() + ttl,
        },
        &jsonwebtoken::EncodingKey::from_secret(SECRET),
    )
    .unwrap();
    token.parse().unwrap()
}

/// In-memory [`Database`] recording every executed operation.
///
/// Transactions are not isolated: [`Transact`] returns the same [`Mock`].
#[derive(Clone, Debug, Default)]
pub(crate) struct Mock(Arc<Mutex<Tables>>);

/// Contents of a [`Mock`] database.
#[derive(Debug, Default)]
pub(crate) struct Tables {
    pub(crate) users: Vec<User>,
    pub(crate) profiles: Vec<Profile>,
    pub(crate) workouts: Vec<Workout>,
    pub(crate) sets: Vec<Set>,
    pub(crate) exercises: Vec<Exercise>,

    /// Names of the operations to fail.
    pub(crate) failing: HashSet<&'static str>,

    /// Names of the executed operations, in order.
    pub(crate) calls: Vec<&'static str>,
}

impl Mock {
    /// Locks the [`Tables`] of this [`Mock`].
    pub(crate) fn tables(&self) -> MutexGuard<'_, Tables> {
        self.0.lock().unwrap()
    }

    /// Makes the named operation fail from now on.
    pub(crate) fn fail(&self, op: &'static str) {
        _ = self.tables().failing.insert(op);
    }

    /// Records a call of the named operation.
    fn call(
        &self,
        op: &'static str,
    ) -> Result<MutexGuard<'_, Tables>, Traced<database::Error>> {
        let mut tables = self.tables();
        tables.calls.push(op);
        if tables.failing.contains(op) {
            return Err(tracerr::new!(database::Error::Mock(op)));
        }
        Ok(tables)
    }
}

impl Database<Transact> for Mock {
    type Ok = Self;
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Transact) -> Result<Self::Ok, Self::Err> {
        drop(self.call("transact")?);
        Ok(self.clone())
    }
}

impl Database<Commit> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(&self, _: Commit) -> Result<Self::Ok, Self::Err> {
        self.call("commit").map(drop)
    }
}

impl Database<Select<By<Option<User>, user::Id>>> for Mock {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let tables = self.call("select user")?;
        Ok(tables.users.iter().find(|u| u.id == id).cloned())
    }
}

impl<'l> Database<Select<By<Option<User>, &'l user::Email>>> for Mock {
    type Ok = Option<User>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<User>, &'l user::Email>>,
    ) -> Result<Self::Ok, Self::Err> {
        let email = by.into_inner();
        let tables = self.call("select user by email")?;
        Ok(tables.users.iter().find(|u| &u.email == email).cloned())
    }
}

impl Database<Insert<User>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(user): Insert<User>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call("insert user")?.users.push(user);
        Ok(())
    }
}

impl Database<Select<By<Option<Profile>, user::Id>>> for Mock {
    type Ok = Option<Profile>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Profile>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let tables = self.call("select profile")?;
        Ok(tables.profiles.iter().find(|p| p.id == id).cloned())
    }
}

impl Database<Insert<Profile>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(profile): Insert<Profile>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut tables = self.call("insert profile")?;
        if !tables.profiles.iter().any(|p| p.id == profile.id) {
            tables.profiles.push(profile);
        }
        Ok(())
    }
}

impl Database<Update<Profile>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(profile): Update<Profile>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut tables = self.call("update profile")?;
        tables.profiles.retain(|p| p.id != profile.id);
        tables.profiles.push(profile);
        Ok(())
    }
}

impl Database<Insert<Workout>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(workout): Insert<Workout>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call("insert workout")?.workouts.push(workout);
        Ok(())
    }
}

impl Database<Update<Workout>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Update(workout): Update<Workout>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut tables = self.call("update workout")?;
        if let Some(w) = tables.workouts.iter_mut().find(|w| w.id == workout.id)
        {
            *w = workout;
        }
        Ok(())
    }
}

impl Database<Select<By<Option<Workout>, workout::Id>>> for Mock {
    type Ok = Option<Workout>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Workout>, workout::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let id = by.into_inner();
        let tables = self.call("select workout")?;
        Ok(tables.workouts.iter().find(|w| w.id == id).cloned())
    }
}

impl Database<Select<By<Vec<read::workout::Workout>, user::Id>>> for Mock {
    type Ok = Vec<read::workout::Workout>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::workout::Workout>, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        let tables = self.call("select workouts")?;
        let mut workouts = tables
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect::<Vec<_>>();
        workouts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(workouts.into_iter().map(Into::into).collect())
    }
}

impl Database<Select<By<Vec<read::workout::Set>, Vec<workout::Id>>>> for Mock {
    type Ok = Vec<read::workout::Set>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Vec<read::workout::Set>, Vec<workout::Id>>>,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let tables = self.call("select sets")?;
        Ok(tables
            .sets
            .iter()
            .filter(|s| ids.contains(&s.workout_id))
            .cloned()
            .map(Into::into)
            .collect())
    }
}

impl Database<Select<By<read::workout::Count, user::Id>>> for Mock {
    type Ok = read::workout::Count;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<read::workout::Count, user::Id>>,
    ) -> Result<Self::Ok, Self::Err> {
        let user_id = by.into_inner();
        let tables = self.call("count workouts")?;
        let n = tables.workouts.iter().filter(|w| w.user_id == user_id).count();
        Ok(i32::try_from(n).unwrap().into())
    }
}

impl
    Database<
        Select<
            By<read::workout::Count, (user::Id, workout::CreationDateTime)>,
        >,
    > for Mock
{
    type Ok = read::workout::Count;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<read::workout::Count, (user::Id, workout::CreationDateTime)>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let (user_id, since) = by.into_inner();
        let tables = self.call("count workouts since")?;
        let n = tables
            .workouts
            .iter()
            .filter(|w| w.user_id == user_id && w.created_at >= since)
            .count();
        Ok(i32::try_from(n).unwrap().into())
    }
}

impl<'l> Database<Select<By<Option<Exercise>, &'l exercise::Name>>> for Mock {
    type Ok = Option<Exercise>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<Exercise>, &'l exercise::Name>>,
    ) -> Result<Self::Ok, Self::Err> {
        let name = by.into_inner();
        let tables = self.call("select exercise by name")?;
        Ok(tables.exercises.iter().find(|e| &e.name == name).cloned())
    }
}

impl Database<Select<By<HashMap<exercise::Id, Exercise>, Vec<exercise::Id>>>>
    for Mock
{
    type Ok = HashMap<exercise::Id, Exercise>;
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Select(by): Select<
            By<HashMap<exercise::Id, Exercise>, Vec<exercise::Id>>,
        >,
    ) -> Result<Self::Ok, Self::Err> {
        let ids = by.into_inner();
        let tables = self.call("select exercises")?;
        Ok(tables
            .exercises
            .iter()
            .filter(|e| ids.contains(&e.id))
            .map(|e| (e.id, e.clone()))
            .collect())
    }
}

impl Database<Insert<Exercise>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(exercise): Insert<Exercise>,
    ) -> Result<Self::Ok, Self::Err> {
        let mut tables = self.call("insert exercise")?;
        if !tables.exercises.iter().any(|e| e.name == exercise.name) {
            tables.exercises.push(exercise);
        }
        Ok(())
    }
}

impl Database<Insert<Set>> for Mock {
    type Ok = ();
    type Err = Traced<database::Error>;

    async fn execute(
        &self,
        Insert(set): Insert<Set>,
    ) -> Result<Self::Ok, Self::Err> {
        self.call("insert set")?.sets.push(set);
        Ok(())
    }
}
